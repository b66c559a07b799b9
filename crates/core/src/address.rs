//! Canonical target address model
//!
//! A target address is the textual reference users and Pants itself use to
//! point at one target (`path:name`) or at every target of a directory,
//! either shallow (`path:`) or recursively (`path::`).

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What part of a directory an address selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddressKind {
    /// `path:name`
    SingleTarget,
    /// `path:` - targets declared directly in `path`
    AllInDirShallow,
    /// `path::` - targets declared in `path` and every directory below it
    AllInDirDeep,
}

/// A parsed target specification
///
/// Equality is structural over `(path, kind, name)`. Paths are normalized
/// lexically and never touch the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TargetAddress {
    path: String,
    kind: AddressKind,
    name: Option<String>,
}

impl TargetAddress {
    /// One named target in `path`; an empty path is the build root (`//:name`)
    pub fn single(path: &str, name: &str) -> Option<Self> {
        let path = normalize_path(path);
        if name.is_empty() || path.contains(':') || name.contains(':') {
            return None;
        }
        Some(Self {
            path,
            kind: AddressKind::SingleTarget,
            name: Some(name.to_string()),
        })
    }

    /// Every target declared directly in `path`
    pub fn shallow(path: &str) -> Option<Self> {
        Self::directory(path, AddressKind::AllInDirShallow)
    }

    /// Every target declared in `path` or below it
    pub fn deep(path: &str) -> Option<Self> {
        Self::directory(path, AddressKind::AllInDirDeep)
    }

    fn directory(path: &str, kind: AddressKind) -> Option<Self> {
        let path = normalize_path(path);
        if path.contains(':') {
            return None;
        }
        Some(Self {
            path,
            kind,
            name: None,
        })
    }

    /// Parse a spec string. Returns `None` on anything unparsable, never panics.
    ///
    /// Rules, in priority order:
    /// 1. exactly one `:` between two non-empty segments is a single target
    /// 2. a trailing `::` selects the directory recursively
    /// 3. a trailing `:` selects the directory shallowly
    /// 4. no `:` at all is a single target named after the last path segment
    pub fn parse(s: &str) -> Option<Self> {
        let colons = s.matches(':').count();

        if colons == 1 {
            if let Some((path, name)) = s.split_once(':') {
                if !path.is_empty() && !name.is_empty() {
                    return Self::single(path, name);
                }
            }
        }

        if let Some(path) = s.strip_suffix("::") {
            return if path.contains(':') {
                None
            } else {
                Self::deep(path)
            };
        }

        if let Some(path) = s.strip_suffix(':') {
            return if path.contains(':') {
                None
            } else {
                Self::shallow(path)
            };
        }

        if colons == 0 {
            let path = normalize_path(s);
            let name = path.rsplit('/').next().unwrap_or_default().to_string();
            return Self::single(&path, &name);
        }

        None
    }

    /// Canonical string form, the inverse of [`TargetAddress::parse`]
    pub fn format(&self) -> String {
        match self.kind {
            AddressKind::SingleTarget => {
                let name = self.name.as_deref().unwrap_or_default();
                if self.path.is_empty() {
                    format!("//:{name}")
                } else {
                    format!("{}:{}", self.path, name)
                }
            }
            AddressKind::AllInDirShallow => format!("{}:", self.path),
            AddressKind::AllInDirDeep => format!("{}::", self.path),
        }
    }

    /// Directory relative to the build root, empty for the root itself
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> AddressKind {
        self.kind
    }

    /// Target name, present only for [`AddressKind::SingleTarget`]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_single(&self) -> bool {
        self.kind == AddressKind::SingleTarget
    }

    /// Same directory and same target name
    pub fn matches_single(&self, other: &TargetAddress) -> bool {
        self.path == other.path && self.name.is_some() && self.name == other.name
    }

    /// Whether this address, used as a pattern, selects `other`
    pub fn contains(&self, other: &TargetAddress) -> bool {
        match self.kind {
            AddressKind::SingleTarget => self == other,
            AddressKind::AllInDirShallow => self.path == other.path,
            AddressKind::AllInDirDeep => {
                self.path.is_empty()
                    || other.path == self.path
                    || other
                        .path
                        .strip_prefix(&self.path)
                        .is_some_and(|rest| rest.starts_with('/'))
            }
        }
    }
}

/// Drop empty and `.` segments; `..` stays as written.
pub(crate) fn normalize_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

impl fmt::Display for TargetAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for TargetAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| Error::MalformedAddress {
            spec: s.to_string(),
        })
    }
}

impl TryFrom<String> for TargetAddress {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TargetAddress> for String {
    fn from(address: TargetAddress) -> Self {
        address.format()
    }
}
