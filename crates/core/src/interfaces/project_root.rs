//! Project root interface
//!
//! The IDE project model owns the notion of "where the build root is". The
//! engine only needs to resolve relative spec paths against it and ask
//! whether a directory exists there.

use path_clean::PathClean;
use std::path::{Path, PathBuf};

/// Supplies the canonical project root
pub trait ProjectRoot: Send + Sync {
    /// Absolute build root
    fn root(&self) -> &Path;

    /// Resolve a spec path (relative to the root) to a lexically cleaned
    /// absolute path
    fn resolve(&self, relative: &str) -> PathBuf {
        self.root().join(relative.trim_start_matches('/')).clean()
    }

    /// Whether `relative` names a directory inside the root.
    ///
    /// The one directory-detection rule; the validator applies it before
    /// anything is listed.
    fn has_directory(&self, relative: &str) -> bool;
}
