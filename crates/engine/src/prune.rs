//! Dropping main manifest entries for files that are gone

use crate::hooks::Confirm;
use hashkeep_core::manifest::{self, ManifestKind};
use ahash::AHashSet;
use hashkeep_core::{paths, storage, ManifestLine, Result};
use hashkeep_walker::{TreeWalker, WalkdirWalker};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// Paths whose lines were dropped
    pub removed: Vec<String>,
    /// Missing paths the confirmation policy chose to keep
    pub declined: Vec<String>,
    /// Manifest written, if anything changed
    pub manifest: Option<PathBuf>,
}

impl PruneReport {
    pub fn count(&self) -> usize {
        self.removed.len()
    }
}

/// Removes lines for missing files from the main manifest. Nested manifests
/// are never touched.
pub struct PruningEngine<W: TreeWalker = WalkdirWalker> {
    walker: W,
    save_original: bool,
}

impl PruningEngine {
    pub fn new() -> Self {
        Self::with_walker(WalkdirWalker::new())
    }
}

impl Default for PruningEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWalker> PruningEngine<W> {
    pub fn with_walker(walker: W) -> Self {
        Self {
            walker,
            save_original: false,
        }
    }

    /// Rotate the full manifest aside before writing the pruned one
    pub fn save_original(mut self, save: bool) -> Self {
        self.save_original = save;
        self
    }

    /// Prune the main manifest of `root`, asking `confirm` once per missing
    /// file. Without a main manifest this is a no-op.
    pub fn prune(&self, root: &Path, confirm: &mut dyn Confirm) -> Result<PruneReport> {
        let kind = ManifestKind::Main;
        let main = root.join(kind.filename());
        let mut report = PruneReport::default();

        if !main.exists() {
            warn!("no main manifest at {}; nothing to prune", main.display());
            return Ok(report);
        }

        let entries = manifest::read_kind(&main, kind)?;
        let present = self.snapshot(root)?;
        let mut kept: Vec<ManifestLine> = Vec::with_capacity(entries.len());

        for entry in entries {
            if present.contains(&paths::concat(".", &entry.path)) {
                kept.push(entry);
                continue;
            }

            let description = format!("remove '{}' from {}", entry.path, main.display());
            if confirm.confirm(&description) {
                debug!("pruning {}", entry.path);
                report.removed.push(entry.path);
            } else {
                report.declined.push(entry.path.clone());
                kept.push(entry);
            }
        }

        if report.removed.is_empty() {
            info!("nothing pruned from {}", main.display());
            return Ok(report);
        }

        let target = storage::resolve(root, !self.save_original, kind)?;
        manifest::write_atomic(&target, &manifest::render(kind, &kept, false))?;

        info!(
            "pruned {} lines from {} ({} kept)",
            report.removed.len(),
            target.display(),
            kept.len()
        );
        report.manifest = Some(target);
        Ok(report)
    }

    /// Root-relative manifest paths of every file currently under `root`
    fn snapshot(&self, root: &Path) -> Result<AHashSet<String>> {
        let mut present = AHashSet::new();
        for listing in self.walker.walk(root, false)? {
            let rel_dir = paths::relative_dir(root, &listing.dir);
            present.extend(
                listing
                    .files
                    .iter()
                    .map(|file| paths::concat(&rel_dir, &file.name)),
            );
        }
        debug!("{} files present under {}", present.len(), root.display());
        Ok(present)
    }
}
