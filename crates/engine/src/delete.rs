//! Removing nested manifests from a tree

use crate::hooks::RemovalSink;
use hashkeep_core::manifest::{self, ManifestKind};
use hashkeep_core::Result;
use hashkeep_walker::{TreeWalker, WalkdirWalker};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of [`DeletionEngine::delete_nested`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteReport {
    pub removed: Vec<PathBuf>,
    /// Files with the nested manifest name but the wrong header, left in place
    pub mismatched: Vec<PathBuf>,
}

pub struct DeletionEngine<W: TreeWalker = WalkdirWalker> {
    walker: W,
}

impl DeletionEngine {
    pub fn new() -> Self {
        Self::with_walker(WalkdirWalker::new())
    }
}

impl Default for DeletionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWalker> DeletionEngine<W> {
    pub fn with_walker(walker: W) -> Self {
        Self { walker }
    }

    /// Hand every nested manifest under `root` to `removal`. Files that only
    /// share the name are reported, never removed.
    pub fn delete_nested(&self, root: &Path, removal: &mut dyn RemovalSink) -> Result<DeleteReport> {
        let kind = ManifestKind::Nested;
        let mut report = DeleteReport::default();

        for listing in self.walker.walk(root, false)? {
            for file in listing.files.iter().filter(|f| f.name == kind.filename()) {
                if manifest::has_header(&file.path, kind)? {
                    removal.remove(&file.path)?;
                    report.removed.push(file.path.clone());
                } else {
                    warn!("{} has an unexpected header; left in place", file.path.display());
                    report.mismatched.push(file.path.clone());
                }
            }
        }

        info!(
            "removed {} nested manifests, {} left for review",
            report.removed.len(),
            report.mismatched.len()
        );
        Ok(report)
    }
}
