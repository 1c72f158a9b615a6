//! Ignore rules for checksum generation
//!
//! Supports three sources, all optional:
//! 1. Exact file names given on the command line or in config
//! 2. A names file: one exact file name per line
//! 3. gitignore-style patterns, matched against the root-relative path

use ::ignore::gitignore::{Gitignore, GitignoreBuilder};
use ahash::AHashSet;
use anyhow::{Context, Result};
use hashkeep_core::paths::nfc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Ignore configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnoreConfig {
    /// Exact file names to skip
    #[serde(default)]
    pub names: Vec<String>,

    /// File listing more names to skip, one per line
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// gitignore-style patterns
    #[serde(default)]
    pub patterns: Vec<String>,
}

/// Compiled ignore rules
#[derive(Debug, Clone, Default)]
pub struct IgnoreRules {
    names: AHashSet<String>,
    patterns: Option<Gitignore>,
}

impl IgnoreRules {
    /// Rules that ignore nothing
    pub fn none() -> Self {
        Self::default()
    }

    /// Rules from exact names only
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            names: names.into_iter().map(|n| nfc(n.as_ref())).collect(),
            patterns: None,
        }
    }

    /// Load all sources named by `config`. Patterns are anchored at `root`.
    pub fn load(root: &Path, config: &IgnoreConfig) -> Result<Self> {
        let mut rules = Self::from_names(&config.names);

        if let Some(file) = &config.file {
            rules.names.extend(load_names_file(file)?);
        }

        if !config.patterns.is_empty() {
            let mut builder = GitignoreBuilder::new(root);
            for pattern in &config.patterns {
                builder
                    .add_line(None, pattern)
                    .with_context(|| format!("Invalid ignore pattern: {}", pattern))?;
            }
            rules.patterns = Some(builder.build().context("Failed to build ignore patterns")?);
        }

        Ok(rules)
    }

    /// Should the file `name`, at root-relative manifest path `rel_path`, be
    /// skipped?
    pub fn should_ignore(&self, name: &str, rel_path: &str) -> bool {
        if self.names.contains(name) {
            return true;
        }

        if let Some(patterns) = &self.patterns {
            let rel = rel_path.strip_prefix("./").unwrap_or(rel_path);
            if patterns
                .matched_path_or_any_parents(Path::new(rel), false)
                .is_ignore()
            {
                return true;
            }
        }

        false
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty() && self.patterns.as_ref().map_or(true, |p| p.is_empty())
    }

    /// Number of exact names
    pub fn name_count(&self) -> usize {
        self.names.len()
    }
}

/// Read a names file: one name per line, blank lines skipped
pub fn load_names_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ignore file: {}", path.display()))?;
    Ok(content
        .lines()
        .map(|line| line.trim_end_matches('\r'))
        .filter(|line| !line.trim().is_empty())
        .map(nfc)
        .collect())
}
