//! Build-tool query channel

use crate::{address::TargetAddress, error::Result};
use async_trait::async_trait;

/// Lists the targets declared under a directory
#[async_trait]
pub trait TargetLister: Send + Sync {
    /// Every target declared in `dir` (relative to the build root) or any
    /// directory below it, one address per declared target.
    async fn list_targets(&self, dir: &str) -> Result<Vec<TargetAddress>>;
}
