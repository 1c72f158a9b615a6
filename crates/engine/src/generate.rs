//! Main manifest generation

use crate::hooks::{ProgressSink, TracingProgress};
use crate::nest::read_nested;
use hashkeep_core::manifest::{self, ManifestKind};
use hashkeep_core::paths;
use hashkeep_core::storage::{self, is_reserved};
use hashkeep_core::{
    hash_file, DirectoryIndex, ManifestError, ManifestLine, Result, UnsortedSourceIndex,
};
use hashkeep_walker::{DirListing, IgnoreRules, TreeWalker, WalkdirWalker};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Options for one generation run
#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Merge into the existing main manifest instead of rotating it aside
    pub updating_only: bool,
    /// External listing consulted before hashing
    pub unsorted: Option<UnsortedSourceIndex>,
    pub ignore: IgnoreRules,
}

/// A file whose name was ambiguous in the unsorted source and whose content
/// matched none of the candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedChecksum {
    pub filename: String,
    pub dir: PathBuf,
}

impl fmt::Display for FailedChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' - ({})", self.filename, self.dir.display())
    }
}

/// Where each checksum of a run came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceCounts {
    /// Already in the main manifest, left alone
    pub recorded: usize,
    pub nested: usize,
    pub unsorted: usize,
    /// Hashed to confirm an ambiguous unsorted entry
    pub verified: usize,
    pub hashed: usize,
    pub ignored: usize,
}

/// Outcome of [`ChecksumEngine::generate`]
#[derive(Debug, Clone)]
pub struct GenerateReport {
    pub manifest: PathBuf,
    /// Entry lines appended to the manifest
    pub written: usize,
    pub counts: SourceCounts,
    pub failed: Vec<FailedChecksum>,
}

/// Builds or extends the main manifest of a tree
pub struct ChecksumEngine<W: TreeWalker = WalkdirWalker> {
    walker: W,
    progress: Box<dyn ProgressSink>,
}

impl ChecksumEngine {
    pub fn new() -> Self {
        Self::with_walker(WalkdirWalker::new())
    }
}

impl Default for ChecksumEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWalker> ChecksumEngine<W> {
    pub fn with_walker(walker: W) -> Self {
        Self {
            walker,
            progress: Box::new(TracingProgress),
        }
    }

    /// Replace the progress sink
    pub fn progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    /// Generate the main manifest for `root`.
    ///
    /// Every new line is computed before the manifest slot is resolved, so a
    /// rotation happens only once there is something ready to write.
    pub fn generate(&self, root: &Path, options: &GenerateOptions) -> Result<GenerateReport> {
        let recorded = self.load_recorded(root, options.updating_only)?;

        let mut keyed: Vec<(String, DirListing)> = self
            .walker
            .walk(root, false)?
            .into_iter()
            .map(|listing| (paths::relative_dir(root, &listing.dir), listing))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| natord::compare(a, b));

        let mut counts = SourceCounts::default();
        let mut failed = Vec::new();
        let mut lines: Vec<String> = Vec::new();

        for (rel_dir, mut listing) in keyed {
            listing.files.sort_by(|a, b| natord::compare(&a.name, &b.name));
            let nested = read_nested(&listing.dir)?.unwrap_or_default();
            let already = recorded.get(&rel_dir);

            for file in &listing.files {
                let rel_path = paths::concat(&rel_dir, &file.name);

                if is_reserved(&file.name) || options.ignore.should_ignore(&file.name, &rel_path) {
                    counts.ignored += 1;
                    continue;
                }
                if already.is_some_and(|entries| entries.contains(&file.name)) {
                    counts.recorded += 1;
                    continue;
                }

                let checksum = if let Some(checksum) = nested.get(&file.name) {
                    counts.nested += 1;
                    *checksum
                } else if let Some(checksum) =
                    options.unsorted.as_ref().and_then(|u| u.unique(&file.name))
                {
                    counts.unsorted += 1;
                    *checksum
                } else if let Some(candidates) =
                    options.unsorted.as_ref().and_then(|u| u.candidates(&file.name))
                {
                    let fresh = hash_file(&file.path)?;
                    if !candidates.contains(&fresh) {
                        warn!("{} matches none of its {} candidates", rel_path, candidates.len());
                        failed.push(FailedChecksum {
                            filename: file.name.clone(),
                            dir: listing.dir.clone(),
                        });
                        continue;
                    }
                    counts.verified += 1;
                    fresh
                } else {
                    counts.hashed += 1;
                    hash_file(&file.path)?
                };

                debug!("{} -> {}", rel_path, checksum);
                self.progress.status(&rel_path);
                lines.push(
                    ManifestLine::new(rel_path, checksum).to_line(ManifestKind::Main.format(), false),
                );
            }
        }
        self.progress.finish();

        let target = storage::resolve(root, options.updating_only, ManifestKind::Main)?;
        let fresh_file = !target.exists();
        let output: Vec<String> = std::iter::once(ManifestKind::Main.header().to_string())
            .chain(lines)
            .collect();
        let appended = manifest::append_unique(&target, &output)?;
        let written = if fresh_file { appended.saturating_sub(1) } else { appended };

        info!(
            "generated {}: {} new lines, {} already recorded, {} failed",
            target.display(),
            written,
            counts.recorded,
            failed.len()
        );

        Ok(GenerateReport {
            manifest: target,
            written,
            counts,
            failed,
        })
    }

    /// Entries of the current main manifest, used to skip recorded files.
    /// A fresh (non-updating) run starts from nothing.
    fn load_recorded(&self, root: &Path, updating_only: bool) -> Result<DirectoryIndex> {
        let kind = ManifestKind::Main;
        let canonical = root.join(kind.filename());

        if !updating_only {
            // fail before hashing anything if the slot is taken by a foreign file
            if canonical.exists() && !manifest::has_header(&canonical, kind)? {
                return Err(ManifestError::HeaderMismatch {
                    path: canonical,
                    expected: kind.header(),
                });
            }
            return Ok(DirectoryIndex::new());
        }

        let current = storage::resolve(root, true, kind)?;
        if !current.exists() {
            return Ok(DirectoryIndex::new());
        }
        DirectoryIndex::build(&manifest::read_kind(&current, kind)?)
    }
}
