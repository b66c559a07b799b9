//! `fastpass amend` backed mutation channel

use crate::bsp::BspProject;
use crate::command::ToolCommand;
use crate::config::ToolConfig;
use crate::error::{Error, Result};
use crate::interfaces::{Amender, PendingAmend};
use crate::services::pants_cli::resolve_program;
use futures::FutureExt;
use std::path::Path;

pub const DEFAULT_FASTPASS_COMMAND: &str = "fastpass/bin/fastpass";

#[derive(Debug, Clone)]
pub struct FastpassAmender {
    project: BspProject,
    config: ToolConfig,
}

impl FastpassAmender {
    pub fn new(project: BspProject, config: ToolConfig) -> Self {
        Self { project, config }
    }

    pub fn project(&self) -> &BspProject {
        &self.project
    }

    /// Launcher path, which must exist when it points into the build root
    pub fn fastpass_path(&self) -> Result<String> {
        let configured = self.config.command.as_deref();
        let program = resolve_program(
            self.project.pants_root(),
            configured.unwrap_or(DEFAULT_FASTPASS_COMMAND),
        );

        if configured.is_none() && !Path::new(&program).is_file() {
            return Err(Error::ConfigError(format!(
                "Could not find fastpass executable at {program}"
            )));
        }
        Ok(program)
    }

    /// `fastpass amend ... --new-targets <targets>` run in the Pants root
    pub fn amend_command(&self, targets: &str) -> Result<ToolCommand> {
        let cmd = ToolCommand::new(self.fastpass_path()?)
            .args(self.config.args().iter().cloned())
            .args([
                "amend",
                "--no-bloop-exit",
                "--intellij",
                "--intellij-launcher",
                "echo",
            ])
            .arg(self.project.name())
            .arg("--new-targets")
            .arg(targets)
            .with_working_dir(self.project.pants_root())
            .with_env(
                "FASTPASS_HOME",
                self.project.fastpass_home().to_string_lossy(),
            );

        Ok(self
            .config
            .env_pairs()
            .into_iter()
            .fold(cmd, |cmd, (key, value)| cmd.with_env(key, value)))
    }
}

impl Amender for FastpassAmender {
    fn start_amend(&self, targets: &str) -> Result<PendingAmend> {
        let running = self.amend_command(targets)?.spawn()?;
        Ok(async move { running.wait().await.map(|_| ()) }.boxed())
    }
}
