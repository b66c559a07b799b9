//! Shared fixtures for the workspace-level integration tests

use async_trait::async_trait;
use futures::FutureExt;
use pantsbridge_core::interfaces::{Amender, PendingAmend, TargetLister};
use pantsbridge_core::{Error, Result, TargetAddress};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio::sync::oneshot;

/// A temporary build root with the given directories
pub fn workspace(dirs: &[&str]) -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    fs::write(temp.path().join("pants"), "").expect("pants marker");
    for dir in dirs {
        fs::create_dir_all(temp.path().join(dir)).expect("workspace dir");
    }
    temp
}

/// Answers `list` for each directory with a scripted output
#[derive(Default)]
pub struct ScriptedLister {
    outputs: HashMap<String, std::result::Result<Vec<String>, String>>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedLister {
    pub fn new() -> Self {
        Self::default()
    }

    /// `pants list <dir>::` prints `lines`
    pub fn listing(mut self, dir: &str, lines: &[&str]) -> Self {
        self.outputs.insert(
            dir.to_string(),
            Ok(lines.iter().map(|l| l.to_string()).collect()),
        );
        self
    }

    /// `pants list <dir>::` exits 1 with `stderr`
    pub fn failing(mut self, dir: &str, stderr: &str) -> Self {
        self.outputs.insert(dir.to_string(), Err(stderr.to_string()));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TargetLister for ScriptedLister {
    async fn list_targets(&self, dir: &str) -> Result<Vec<TargetAddress>> {
        self.calls.lock().push(dir.to_string());
        tokio::time::sleep(Duration::from_millis(10)).await;

        match self.outputs.get(dir) {
            Some(Ok(lines)) => Ok(lines
                .iter()
                .filter_map(|line| TargetAddress::parse(line))
                .collect()),
            Some(Err(stderr)) => Err(Error::ExternalProcessFailure {
                command: format!("./pants list {dir}::"),
                code: Some(1),
                stdout: String::new(),
                stderr: stderr.clone(),
            }),
            None => Ok(Vec::new()),
        }
    }
}

/// Amends that stay running until released by the test
#[derive(Default)]
pub struct GatedAmender {
    started: Mutex<Vec<String>>,
    gates: Mutex<Vec<Option<oneshot::Sender<Result<()>>>>>,
}

impl GatedAmender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Target arguments of every amend started so far
    pub fn started(&self) -> Vec<String> {
        self.started.lock().clone()
    }

    pub fn release(&self, index: usize, outcome: Result<()>) {
        if let Some(gate) = self.gates.lock().get_mut(index).and_then(Option::take) {
            let _ = gate.send(outcome);
        }
    }
}

impl Amender for GatedAmender {
    fn start_amend(&self, targets: &str) -> Result<PendingAmend> {
        let (tx, rx) = oneshot::channel();
        self.started.lock().push(targets.to_string());
        self.gates.lock().push(Some(tx));
        Ok(async move {
            rx.await
                .unwrap_or_else(|_| Err(Error::Other("amend abandoned".to_string())))
        }
        .boxed())
    }
}
