use anyhow::{Context, Result, anyhow};
use pantsbridge_core::Session;
use std::path::Path;
use tracing::debug;

use crate::display::describe_error;

pub async fn list_command(cwd: &Path, dir: &str) -> Result<()> {
    debug!("Listing targets under '{}'", dir);

    let session = Session::open(cwd).context("Failed to open Pants workspace")?;
    let targets = session
        .fresh_cache()
        .get_targets(dir)
        .await
        .map_err(|e| anyhow!(describe_error(&e)))?;

    for target in targets.iter() {
        println!("{}", target);
    }
    Ok(())
}
