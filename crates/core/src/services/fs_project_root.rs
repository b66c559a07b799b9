//! Filesystem backed project root

use crate::error::{Error, Result};
use crate::interfaces::ProjectRoot;
use std::path::{Path, PathBuf};

/// Marker files identifying a Pants build root
pub const BUILD_ROOT_MARKERS: [&str; 3] = ["pants", "pants.toml", "pants.ini"];

/// [`ProjectRoot`] over a real directory
#[derive(Debug, Clone)]
pub struct FsProjectRoot {
    root: PathBuf,
}

impl FsProjectRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Walk up from `from` to the nearest Pants build root
    pub fn discover(from: &Path) -> Result<Self> {
        find_build_root(from)
            .map(Self::new)
            .ok_or_else(|| Error::NotAPantsProject(from.to_path_buf()))
    }
}

impl ProjectRoot for FsProjectRoot {
    fn root(&self) -> &Path {
        &self.root
    }

    fn has_directory(&self, relative: &str) -> bool {
        let resolved = self.resolve(relative);
        // `..` may clean to somewhere outside the build root
        resolved.starts_with(&self.root) && resolved.is_dir()
    }
}

/// Nearest directory at or above `from` containing a build root marker
pub fn find_build_root(from: &Path) -> Option<PathBuf> {
    let mut current = if from.is_file() {
        from.parent()?.to_path_buf()
    } else {
        from.to_path_buf()
    };

    loop {
        if BUILD_ROOT_MARKERS
            .iter()
            .any(|marker| current.join(marker).is_file())
        {
            return Some(current);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_has_directory() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/java")).unwrap();
        fs::write(temp.path().join("src/BUILD"), "").unwrap();
        let root = FsProjectRoot::new(temp.path());

        assert!(root.has_directory("src/java"));
        assert!(root.has_directory(""));
        assert!(!root.has_directory("missing"));
        assert!(!root.has_directory("src/BUILD"));
        assert!(!root.has_directory("src/../.."));
    }

    #[test]
    fn test_resolve_is_lexical() {
        let root = FsProjectRoot::new("/repo");
        assert_eq!(root.resolve("a/./b/"), PathBuf::from("/repo/a/b"));
        assert_eq!(root.resolve("a/../c"), PathBuf::from("/repo/c"));
        assert_eq!(root.resolve(""), PathBuf::from("/repo"));
    }

    #[test]
    fn test_discover_walks_up() {
        let temp = TempDir::new().unwrap();
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();
        fs::write(temp.path().join("pants"), "#!/bin/sh\n").unwrap();

        let root = FsProjectRoot::discover(&nested).unwrap();
        assert_eq!(root.root(), temp.path());
    }

    #[test]
    fn test_discover_without_marker_fails() {
        let temp = TempDir::new().unwrap();
        // A marker higher up (e.g. in the machine's filesystem root) would make
        // this test meaningless, so only assert on the error shape if none is found.
        match find_build_root(temp.path()) {
            None => assert!(matches!(
                FsProjectRoot::discover(temp.path()),
                Err(Error::NotAPantsProject(_))
            )),
            Some(found) => assert!(!found.starts_with(temp.path())),
        }
    }
}
