//! Configuration file loading
//!
//! Looked up at `<root>/.hashkeep.toml`, then `<config dir>/hashkeep/config.toml`.
//! The first file found is used as a whole; command-line flags override it.

use anyhow::{Context, Result};
use hashkeep_walker::IgnoreConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name of the per-tree configuration file
pub const LOCAL_CONFIG: &str = ".hashkeep.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ignore: IgnoreConfig,
    pub prune: PruneConfig,
    pub generate: GenerateConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneConfig {
    /// Ask before dropping each line (default: true)
    pub confirm: bool,
    /// Rotate the full manifest aside before writing (default: false)
    pub save_original: bool,
}

impl Default for PruneConfig {
    fn default() -> Self {
        Self {
            confirm: true,
            save_original: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    pub updating_only: bool,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Resolve a relative ignore file against `root`
    pub fn ignore_for(&self, root: &Path) -> IgnoreConfig {
        let mut ignore = self.ignore.clone();
        if let Some(file) = &ignore.file {
            if file.is_relative() {
                ignore.file = Some(root.join(file));
            }
        }
        ignore
    }
}

/// User-wide config file location
pub fn global_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("hashkeep").join("config.toml"))
}

/// First existing config file for `root`
pub fn locate(root: &Path) -> Option<PathBuf> {
    let local = root.join(LOCAL_CONFIG);
    if local.is_file() {
        return Some(local);
    }
    global_config_path().filter(|path| path.is_file())
}

/// Load the effective configuration and the file it came from
pub fn load(root: &Path) -> Result<(Config, Option<PathBuf>)> {
    match locate(root) {
        Some(path) => {
            debug!("using config {}", path.display());
            Ok((Config::from_file(&path)?, Some(path)))
        }
        None => Ok((Config::default(), None)),
    }
}
