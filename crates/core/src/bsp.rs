//! BSP import metadata
//!
//! A fastpass import produces a BSP project directory (holding `.bloop` and
//! `.bsp/bloop.json`) next to, but separate from, the Pants workspace.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BspProject {
    bsp_path: PathBuf,
    pants_root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct BloopConfig {
    #[serde(rename = "pantsTargets", default)]
    pants_targets: Vec<String>,
}

impl BspProject {
    pub fn new(bsp_path: impl Into<PathBuf>, pants_root: impl Into<PathBuf>) -> Self {
        Self {
            bsp_path: bsp_path.into(),
            pants_root: pants_root.into(),
        }
    }

    /// `Some` when `bsp_path` is an imported BSP project
    pub fn detect(bsp_path: &Path, pants_root: &Path) -> Option<Self> {
        if bsp_path.join(".bloop").exists() {
            Some(Self::new(bsp_path, pants_root))
        } else {
            tracing::debug!("No .bloop directory in {:?}", bsp_path);
            None
        }
    }

    pub fn bsp_path(&self) -> &Path {
        &self.bsp_path
    }

    pub fn pants_root(&self) -> &Path {
        &self.pants_root
    }

    /// Project name passed to `fastpass amend`
    pub fn name(&self) -> String {
        self.bsp_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `FASTPASS_HOME`: the directory fastpass keeps its projects in
    pub fn fastpass_home(&self) -> &Path {
        self.bsp_path.parent().unwrap_or(&self.bsp_path)
    }

    pub fn bloop_json(&self) -> PathBuf {
        self.bsp_path.join(".bsp").join("bloop.json")
    }

    /// Target specs the project was imported with
    pub async fn selected_targets(&self) -> Result<BTreeSet<String>> {
        let contents = tokio::fs::read_to_string(self.bloop_json()).await?;
        let config: BloopConfig = serde_json::from_str(&contents)?;
        Ok(config.pants_targets.into_iter().collect())
    }
}
