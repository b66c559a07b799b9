//! `pants list` backed target lister

use crate::address::TargetAddress;
use crate::command::ToolCommand;
use crate::config::ToolConfig;
use crate::error::Result;
use crate::interfaces::TargetLister;
use async_trait::async_trait;
use path_clean::PathClean;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const DEFAULT_PANTS_COMMAND: &str = "./pants";

/// Runs the Pants launcher found in the build root
#[derive(Debug, Clone)]
pub struct PantsCli {
    root: PathBuf,
    config: ToolConfig,
}

impl PantsCli {
    pub fn new(root: impl Into<PathBuf>, config: ToolConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Base command with the configured launcher, arguments and environment
    pub fn command(&self) -> ToolCommand {
        let program = self
            .config
            .command
            .as_deref()
            .unwrap_or(DEFAULT_PANTS_COMMAND);

        ToolCommand {
            program: resolve_program(&self.root, program),
            args: self.config.args().to_vec(),
            working_dir: Some(self.root.clone()),
            env: self.config.env_pairs(),
        }
    }

    /// `pants list <dir>::`
    pub fn list_command(&self, dir: &str) -> ToolCommand {
        self.command().arg("list").arg(format!("{dir}::"))
    }
}

#[async_trait]
impl TargetLister for PantsCli {
    async fn list_targets(&self, dir: &str) -> Result<Vec<TargetAddress>> {
        let output = self.list_command(dir).run().await?;
        let targets = parse_target_lines(output.lines());
        debug!("`pants list {}::` declared {} targets", dir, targets.len());
        Ok(targets)
    }
}

/// One address per line; unparsable lines are logged and skipped
pub fn parse_target_lines<'a>(lines: impl Iterator<Item = &'a str>) -> Vec<TargetAddress> {
    lines
        .filter_map(|line| {
            let parsed = TargetAddress::parse(line);
            if parsed.is_none() {
                warn!("Ignoring unparsable target address from pants: {:?}", line);
            }
            parsed
        })
        .collect()
}

/// Launchers given as a relative path (`./pants`, `fastpass/bin/fastpass`)
/// live in the build root. Bare names are looked up on `PATH`.
pub(crate) fn resolve_program(root: &Path, program: &str) -> String {
    let path = Path::new(program);
    if path.is_relative() && path.components().count() > 1 {
        root.join(path).clean().to_string_lossy().into_owned()
    } else {
        program.to_string()
    }
}
