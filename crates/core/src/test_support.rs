//! In-memory collaborators for unit tests

use crate::address::TargetAddress;
use crate::error::{Error, Result};
use crate::interfaces::{Amender, PendingAmend, TargetLister};
use async_trait::async_trait;
use futures::FutureExt;
use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Answers `list` queries from a fixed set of declared targets
#[derive(Default)]
pub struct FakeLister {
    declared: Vec<TargetAddress>,
    failing: HashSet<String>,
    delay: Duration,
    calls: Mutex<Vec<String>>,
}

impl FakeLister {
    pub fn new(declared: &[&str]) -> Self {
        Self {
            declared: declared
                .iter()
                .map(|s| TargetAddress::parse(s).unwrap())
                .collect(),
            delay: Duration::from_millis(20),
            ..Default::default()
        }
    }

    pub fn failing_on(mut self, dir: &str) -> Self {
        self.failing.insert(dir.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl TargetLister for FakeLister {
    async fn list_targets(&self, dir: &str) -> Result<Vec<TargetAddress>> {
        self.calls.lock().push(dir.to_string());
        tokio::time::sleep(self.delay).await;

        if self.failing.contains(dir) {
            return Err(Error::ExternalProcessFailure {
                command: format!("./pants list {dir}::"),
                code: Some(1),
                stdout: String::new(),
                stderr: format!("cannot list {dir}"),
            });
        }

        let pattern = TargetAddress::deep(dir).unwrap();
        Ok(self
            .declared
            .iter()
            .filter(|t| pattern.contains(t))
            .cloned()
            .collect())
    }
}

/// Records every started amend; each stays pending until released
#[derive(Default)]
pub struct FakeAmender {
    started: Mutex<Vec<String>>,
    pending: Mutex<Vec<Option<oneshot::Sender<Result<()>>>>>,
}

impl FakeAmender {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn started(&self) -> Vec<String> {
        self.started.lock().clone()
    }

    /// Complete the `index`-th started amend
    pub fn finish(&self, index: usize, outcome: Result<()>) {
        if let Some(tx) = self.pending.lock()[index].take() {
            let _ = tx.send(outcome);
        }
    }
}

impl Amender for FakeAmender {
    fn start_amend(&self, targets: &str) -> Result<PendingAmend> {
        let (tx, rx) = oneshot::channel();
        self.started.lock().push(targets.to_string());
        self.pending.lock().push(Some(tx));
        Ok(async move {
            rx.await
                .unwrap_or_else(|_| Err(Error::Other("amend dropped".to_string())))
        }
        .boxed())
    }
}
