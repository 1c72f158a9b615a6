//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use hashkeep_core::{ManifestError, Result as ManifestResult};
use hashkeep_engine::{Confirm, RemovalSink};
use owo_colors::OwoColorize;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

/// Canonicalize the tree root given on the command line
pub fn resolve_root(root: &Path) -> Result<PathBuf> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Cannot open directory: {}", root.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Not a directory: {}", root.display());
    }
    Ok(root)
}

/// Collapse an `--x` / `--no-x` pair. `None` when neither was given.
pub fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

/// Sends files to the platform trash
pub struct TrashRemoval;

impl RemovalSink for TrashRemoval {
    fn remove(&mut self, path: &Path) -> ManifestResult<()> {
        trash::delete(path)
            .map_err(|e| ManifestError::io(path, io::Error::new(io::ErrorKind::Other, e.to_string())))
    }
}

/// Asks on stdin, one line per question. `a` answers yes to the rest.
pub struct PromptConfirm {
    yes_to_all: bool,
}

impl PromptConfirm {
    pub fn new() -> Self {
        Self { yes_to_all: false }
    }
}

impl Confirm for PromptConfirm {
    fn confirm(&mut self, description: &str) -> bool {
        if self.yes_to_all {
            return true;
        }

        eprint!("{} {} ", description, "[y/N/a]".dimmed());
        let _ = io::stderr().flush();

        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        match answer.trim().to_ascii_lowercase().as_str() {
            "y" | "yes" => true,
            "a" | "all" => {
                self.yes_to_all = true;
                true
            }
            _ => false,
        }
    }
}
