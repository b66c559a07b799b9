use anyhow::{Context, Result, anyhow};
use pantsbridge_core::Session;
use std::path::Path;
use tracing::debug;

use crate::display::{describe_error, preview_to_json, print_preview};

pub async fn preview_command(cwd: &Path, specs: &[String], json: bool) -> Result<()> {
    debug!("Previewing {} specs", specs.len());

    let session = Session::open(cwd).context("Failed to open Pants workspace")?;
    let preview = session
        .validator()
        .preview(specs)
        .await
        .map_err(|e| anyhow!(describe_error(&e)))?;

    if json {
        println!("{}", preview_to_json(&preview)?);
    } else {
        print_preview(&preview);
    }
    Ok(())
}
