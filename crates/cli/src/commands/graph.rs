use anyhow::{Context, Result};
use pantsbridge_core::{BuildGraph, ProjectInfo};
use std::path::Path;
use tracing::debug;

use crate::display::print_graph_summary;

pub fn graph_command(export: &Path, level: Option<usize>) -> Result<()> {
    debug!("Loading export from {}", export.display());

    let project = ProjectInfo::from_file(export)
        .with_context(|| format!("Failed to read export {}", export.display()))?;
    let graph = BuildGraph::from_project(&project);

    print_graph_summary(&graph, level);
    Ok(())
}
