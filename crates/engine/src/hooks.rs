//! Collaborator contracts the engines call out to
//!
//! Progress, removal and confirmation are owned by the caller. The engines
//! only see these traits, so batch and interactive front ends share one
//! implementation.

use hashkeep_core::{ManifestError, Result};
use std::path::Path;
use tracing::debug;

/// Receives status strings while an engine runs. Purely observational.
pub trait ProgressSink {
    fn status(&self, message: &str);

    /// Called once when the engine is done
    fn finish(&self) {}
}

/// Logs status strings at debug level
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn status(&self, message: &str) {
        debug!("{}", message);
    }
}

/// Discards status strings
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn status(&self, _message: &str) {}
}

/// Takes a file out of the tree, ideally in a way the user can undo
pub trait RemovalSink {
    fn remove(&mut self, path: &Path) -> Result<()>;
}

/// Deletes files outright
#[derive(Debug, Clone, Copy, Default)]
pub struct PermanentRemoval;

impl RemovalSink for PermanentRemoval {
    fn remove(&mut self, path: &Path) -> Result<()> {
        std::fs::remove_file(path).map_err(|e| ManifestError::io(path, e))
    }
}

/// Answers "should this happen?" for one described action
pub trait Confirm {
    fn confirm(&mut self, description: &str) -> bool;
}

/// Says yes to everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AutoConfirm;

impl Confirm for AutoConfirm {
    fn confirm(&mut self, _description: &str) -> bool {
        true
    }
}

/// Says no to everything
#[derive(Debug, Clone, Copy, Default)]
pub struct Deny;

impl Confirm for Deny {
    fn confirm(&mut self, _description: &str) -> bool {
        false
    }
}

impl<F> Confirm for F
where
    F: FnMut(&str) -> bool,
{
    fn confirm(&mut self, description: &str) -> bool {
        self(description)
    }
}
