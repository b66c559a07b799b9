use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAMES: [&str; 2] = [".pantsbridge.json", "pantsbridge.json"];

/// Launcher settings for one external tool
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct ToolConfig {
    /// Executable, relative paths are resolved against the Pants root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,

    /// Arguments placed before the subcommand arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_args: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_env: Option<HashMap<String, String>>,
}

impl ToolConfig {
    pub fn merge_with(&mut self, other: ToolConfig) {
        if other.command.is_some() {
            self.command = other.command;
        }
        if other.extra_args.is_some() {
            self.extra_args = other.extra_args;
        }
        if let Some(env) = other.extra_env {
            self.extra_env.get_or_insert_with(HashMap::new).extend(env);
        }
    }

    pub fn args(&self) -> &[String] {
        self.extra_args.as_deref().unwrap_or_default()
    }

    /// Environment pairs in a stable order
    pub fn env_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<_> = self
            .extra_env
            .iter()
            .flatten()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        pairs.sort();
        pairs
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Pants launcher, `./pants` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pants: Option<ToolConfig>,

    /// fastpass launcher, `fastpass/bin/fastpass` when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fastpass: Option<ToolConfig>,

    /// BSP project directory (the one holding `.bloop`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bsp_root: Option<PathBuf>,
}

impl Config {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&contents).map_err(|e| {
            Error::ConfigError(format!("Failed to parse {}: {e}", path.display()))
        })?;
        Ok(config)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| Error::ConfigError(format!("Failed to serialize config: {e}")))?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Nearest config file at or above `start_path`
    pub fn find_config_file(start_path: &Path) -> Option<PathBuf> {
        Self::config_files(start_path).into_iter().next()
    }

    /// Merge every config file from the filesystem root down to
    /// `start_path`; nearer files win.
    pub fn load(start_path: &Path) -> Result<Self> {
        let mut config = Config::default();
        for path in Self::config_files(start_path).into_iter().rev() {
            tracing::debug!("Loading config from {:?}", path);
            config.merge_with(Self::load_from_file(&path)?);
        }
        Ok(config)
    }

    pub fn merge_with(&mut self, other: Config) {
        if let Some(pants) = other.pants {
            self.pants.get_or_insert_with(ToolConfig::default).merge_with(pants);
        }
        if let Some(fastpass) = other.fastpass {
            self.fastpass
                .get_or_insert_with(ToolConfig::default)
                .merge_with(fastpass);
        }
        if other.bsp_root.is_some() {
            self.bsp_root = other.bsp_root;
        }
    }

    // Nearest first
    fn config_files(start_path: &Path) -> Vec<PathBuf> {
        let mut found = Vec::new();
        let mut current = Some(start_path);

        while let Some(dir) = current {
            for name in CONFIG_FILE_NAMES {
                let config_path = dir.join(name);
                if config_path.is_file() {
                    found.push(config_path);
                    break;
                }
            }
            current = dir.parent();
        }

        found
    }
}
