use anyhow::{Context, Result, anyhow};
use pantsbridge_core::amend::TARGET_DELIMITER;
use pantsbridge_core::{Session, TargetAddress};
use pantsbridge_core::services::FastpassAmender;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::{debug, info};

use crate::display::{describe_error, print_command_breakdown, print_preview};

pub async fn amend_command(
    cwd: &Path,
    specs: &[String],
    replace: bool,
    dry_run: bool,
) -> Result<()> {
    let session = Session::open(cwd).context("Failed to open Pants workspace")?;
    let bsp = session.bsp_project().context(
        "No imported BSP project found; set `bsp_root` in .pantsbridge.json",
    )?;

    // Nothing is amended unless every spec resolves
    let preview = session
        .validator()
        .preview(specs)
        .await
        .map_err(|e| anyhow!(describe_error(&e)))?;
    print_preview(&preview);

    let selected = if replace {
        BTreeSet::new()
    } else {
        bsp.selected_targets()
            .await
            .with_context(|| format!("Failed to read {}", bsp.bloop_json().display()))?
    };
    let targets = merge_selection(&selected, preview.keys())
        .with_context(|| format!("Invalid selection in {}", bsp.bloop_json().display()))?;
    debug!("Amending {} to {} specs", bsp.name(), targets.len());

    if dry_run {
        let fastpass = session.config().fastpass.clone().unwrap_or_default();
        let joined = targets
            .iter()
            .map(TargetAddress::to_string)
            .collect::<Vec<_>>()
            .join(TARGET_DELIMITER);
        let command = FastpassAmender::new(bsp.clone(), fastpass).amend_command(&joined)?;
        println!("{}", command.to_shell_command());
        print_command_breakdown(&command);
        return Ok(());
    }

    let amend = match session.amend_service()?.try_amend_all(&targets) {
        Ok(amend) => amend,
        Err(e) if e.is_rejection() => {
            println!("⏳ An amend is already running; try again once it finishes");
            return Ok(());
        }
        Err(e) => return Err(anyhow!(describe_error(&e))),
    };

    info!("Waiting for fastpass to finish");
    amend.await.map_err(|e| anyhow!(describe_error(&e)))?;
    println!("✅ Amended {} with {} specs", bsp.name(), targets.len());
    Ok(())
}

/// Union of the current selection and the requested specs, each target once
/// in canonical form
fn merge_selection<'a>(
    selected: &BTreeSet<String>,
    requested: impl IntoIterator<Item = &'a TargetAddress>,
) -> Result<BTreeSet<TargetAddress>> {
    let mut targets = selected
        .iter()
        .map(|spec| {
            TargetAddress::parse(spec).ok_or_else(|| anyhow!("`{spec}` is not a target address"))
        })
        .collect::<Result<BTreeSet<_>>>()?;
    targets.extend(requested.into_iter().cloned());
    Ok(targets)
}
