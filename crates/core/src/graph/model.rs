//! Resolved project metadata, as produced by `pants export`

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::info;

/// Whole-project snapshot: target address → target metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectInfo {
    #[serde(default)]
    pub targets: BTreeMap<String, TargetInfo>,

    /// Library id (`org:name:version`) → jars
    #[serde(default)]
    pub libraries: BTreeMap<String, LibraryJars>,
}

/// Jars of one library; either a plain list or keyed by configuration
/// (`default`, `sources`, `javadoc`, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LibraryJars {
    List(Vec<String>),
    ByConf(BTreeMap<String, String>),
}

impl LibraryJars {
    pub fn jars(&self) -> Vec<&str> {
        match self {
            LibraryJars::List(jars) => jars.iter().map(String::as_str).collect(),
            LibraryJars::ByConf(jars) => jars.values().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetInfo {
    /// Dependency target addresses
    pub targets: BTreeSet<String>,
    /// Library ids
    pub libraries: BTreeSet<String>,
    pub excludes: BTreeSet<String>,
    pub roots: Vec<SourceRoot>,
    /// `SOURCE`, `TEST`, `RESOURCE`, `TEST_RESOURCE`
    pub target_type: Option<String>,
    /// Pants rule name, e.g. `java_library`
    pub pants_target_type: Option<String>,
    /// Requested directly by the user rather than pulled in transitively
    pub is_target_root: bool,
    pub is_synthetic: bool,
}

impl TargetInfo {
    pub fn is_test(&self) -> bool {
        matches!(self.target_type.as_deref(), Some("TEST" | "TEST_RESOURCE"))
    }

    pub fn is_target_root(&self) -> bool {
        self.is_target_root
    }

    pub fn is_empty(&self) -> bool {
        self.libraries.is_empty() && self.targets.is_empty() && self.roots.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SourceRoot {
    pub source_root: String,
    #[serde(default)]
    pub package_prefix: String,
}

impl SourceRoot {
    /// Directory the package hierarchy starts in.
    ///
    /// When the source root ends with the package prefix's directory form
    /// (`src/java/com/foo` with prefix `com.foo`) the prefix is stripped.
    pub fn package_root(&self) -> &str {
        let dotted = self.source_root.replace('/', ".");
        if !self.package_prefix.is_empty() && dotted.ends_with(&self.package_prefix) {
            let keep = self.source_root.len() - self.package_prefix.len();
            self.source_root[..keep].trim_end_matches('/')
        } else {
            &self.source_root
        }
    }
}

impl ProjectInfo {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn target(&self, address: &str) -> Option<&TargetInfo> {
        self.targets.get(address)
    }

    /// Jars for `library_id`, falling back to any other version of the same
    /// `org:name` that has jars.
    pub fn libraries_for(&self, library_id: &str) -> Vec<&str> {
        if let Some(jars) = self.libraries.get(library_id) {
            let jars = jars.jars();
            if !jars.is_empty() {
                return jars;
            }
        }

        let Some((library_name, _version)) = library_id.rsplit_once(':') else {
            return Vec::new();
        };
        let prefix = format!("{library_name}:");

        for (candidate, jars) in &self.libraries {
            if !candidate.starts_with(&prefix) {
                continue;
            }
            let jars = jars.jars();
            if !jars.is_empty() {
                info!("Using {} instead of {}", candidate, library_id);
                return jars;
            }
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXPORT: &str = r#"{
        "version": "1.0.9",
        "targets": {
            "src/java/foo:lib": {
                "targets": ["3rdparty:guava"],
                "libraries": ["com.google:guava:20.0"],
                "roots": [{"source_root": "src/java/foo", "package_prefix": "foo"}],
                "target_type": "SOURCE",
                "pants_target_type": "java_library",
                "is_target_root": true
            },
            "tests/java/foo:test": {
                "targets": ["src/java/foo:lib"],
                "target_type": "TEST",
                "is_target_root": true
            },
            "3rdparty:guava": {
                "libraries": ["com.google:guava:20.0"]
            }
        },
        "libraries": {
            "com.google:guava:20.0": {"default": "/jars/guava-20.jar"},
            "com.google:guava:19.0": ["/jars/guava-19.jar"],
            "org.empty:none:1.0": []
        }
    }"#;

    #[test]
    fn test_parse_export() {
        let info = ProjectInfo::from_json(EXPORT).unwrap();
        assert_eq!(info.targets.len(), 3);

        let lib = info.target("src/java/foo:lib").unwrap();
        assert!(lib.is_target_root());
        assert!(!lib.is_test());
        assert_eq!(lib.pants_target_type.as_deref(), Some("java_library"));

        let test = info.target("tests/java/foo:test").unwrap();
        assert!(test.is_test());

        let guava = info.target("3rdparty:guava").unwrap();
        assert!(!guava.is_target_root());
        assert!(guava.roots.is_empty());
    }

    #[test]
    fn test_libraries_fallback_to_other_version() {
        let mut info = ProjectInfo::from_json(EXPORT).unwrap();
        assert_eq!(info.libraries_for("com.google:guava:20.0"), vec!["/jars/guava-20.jar"]);

        info.libraries.remove("com.google:guava:20.0");
        assert_eq!(info.libraries_for("com.google:guava:20.0"), vec!["/jars/guava-19.jar"]);

        assert!(info.libraries_for("org.empty:none:1.0").is_empty());
        assert!(info.libraries_for("noversion").is_empty());
    }

    #[test]
    fn test_package_root() {
        let root = SourceRoot {
            source_root: "src/java/com/foo".to_string(),
            package_prefix: "com.foo".to_string(),
        };
        assert_eq!(root.package_root(), "src/java");

        let unrelated = SourceRoot {
            source_root: "src/resources".to_string(),
            package_prefix: "com.foo".to_string(),
        };
        assert_eq!(unrelated.package_root(), "src/resources");

        let no_prefix = SourceRoot {
            source_root: "src/python".to_string(),
            package_prefix: String::new(),
        };
        assert_eq!(no_prefix.package_root(), "src/python");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        assert!(matches!(
            ProjectInfo::from_json("{\"targets\": 3}"),
            Err(crate::error::Error::SerializationError(_))
        ));
    }
}
