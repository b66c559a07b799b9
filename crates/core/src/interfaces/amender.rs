//! Build-tool mutation channel

use crate::error::Result;
use futures::future::BoxFuture;

/// Completion of a started amend
pub type PendingAmend = BoxFuture<'static, Result<()>>;

/// Rewrites the imported target list of a BSP project
pub trait Amender: Send + Sync {
    /// Start the external mutation for `targets`, a comma-delimited target
    /// list.
    ///
    /// The process must already be running when this returns; the returned
    /// future resolves when it exits. Spawn failures are returned directly.
    fn start_amend(&self, targets: &str) -> Result<PendingAmend>;
}
