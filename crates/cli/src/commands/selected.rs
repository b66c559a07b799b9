use anyhow::{Context, Result};
use pantsbridge_core::command::complete_on_timeout;
use pantsbridge_core::{Error, Session};
use std::path::Path;
use std::time::Duration;

pub async fn selected_command(cwd: &Path, timeout_ms: u64) -> Result<()> {
    let session = Session::open(cwd).context("Failed to open Pants workspace")?;
    let bsp = session.bsp_project().context(
        "No imported BSP project found; set `bsp_root` in .pantsbridge.json",
    )?;

    let wait = Duration::from_millis(timeout_ms);
    let timed_out = Err(Error::Other(format!(
        "Timed out reading {}",
        bsp.bloop_json().display()
    )));
    let selected = complete_on_timeout(bsp.selected_targets(), wait, timed_out)
        .await
        .with_context(|| format!("Failed to read selected targets of {}", bsp.name()))?;

    println!("📍 {} ({})", bsp.name(), bsp.bsp_path().display());
    for target in &selected {
        println!("   • {}", target);
    }
    Ok(())
}
