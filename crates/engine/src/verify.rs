//! Checking files on disk against their recorded checksums

use crate::hooks::{ProgressSink, TracingProgress};
use crate::nest::read_nested;
use hashkeep_core::manifest::{self, ManifestKind};
use hashkeep_core::storage::is_reserved;
use hashkeep_core::{hash_file, paths, DirectoryIndex, Result};
use hashkeep_walker::{TreeWalker, WalkdirWalker};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Read one nested manifest per directory instead of the main manifest
    pub use_nested: bool,
    /// Only visit files directly under the root
    pub top_level_only: bool,
}

/// Every visited file lands in exactly one of `passed`, `failed` or `new`.
/// In nested mode a directory without a nested manifest is not visited.
/// Paths are relative to the verified root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VerifyReport {
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub new: Vec<String>,
    /// Directories skipped for lack of a nested manifest
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub missing_manifests: Vec<String>,
    /// No main manifest was found, so nothing was checked
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub main_missing: bool,
}

impl VerifyReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total(&self) -> usize {
        self.passed.len() + self.failed.len() + self.new.len()
    }
}

pub struct VerificationEngine<W: TreeWalker = WalkdirWalker> {
    walker: W,
    progress: Box<dyn ProgressSink>,
}

impl VerificationEngine {
    pub fn new() -> Self {
        Self::with_walker(WalkdirWalker::new())
    }
}

impl Default for VerificationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWalker> VerificationEngine<W> {
    pub fn with_walker(walker: W) -> Self {
        Self {
            walker,
            progress: Box::new(TracingProgress),
        }
    }

    pub fn progress(mut self, sink: impl ProgressSink + 'static) -> Self {
        self.progress = Box::new(sink);
        self
    }

    pub fn verify(&self, root: &Path, options: VerifyOptions) -> Result<VerifyReport> {
        let mut report = VerifyReport::default();

        let main_index = if options.use_nested {
            None
        } else {
            let main = root.join(ManifestKind::Main.filename());
            if !main.exists() {
                warn!("no main manifest at {}; nothing to verify", main.display());
                report.main_missing = true;
                return Ok(report);
            }
            Some(DirectoryIndex::build(&manifest::read_kind(&main, ManifestKind::Main)?)?)
        };

        for listing in self.walker.walk(root, options.top_level_only)? {
            let rel_dir = paths::relative_dir(root, &listing.dir);

            let nested = if options.use_nested {
                match read_nested(&listing.dir)? {
                    Some(nested) => Some(nested),
                    None => {
                        warn!("{} has no nested manifest; skipped", rel_dir);
                        report.missing_manifests.push(rel_dir);
                        continue;
                    }
                }
            } else {
                None
            };
            let main_entries = main_index.as_ref().and_then(|index| index.get(&rel_dir));

            for file in &listing.files {
                if is_reserved(&file.name) {
                    continue;
                }
                let rel_path = paths::concat(&rel_dir, &file.name);
                let expected = if options.use_nested {
                    nested.as_ref().and_then(|map| map.get(&file.name))
                } else {
                    main_entries.and_then(|entries| entries.get(&file.name))
                };

                match expected {
                    None => report.new.push(rel_path),
                    Some(expected) => {
                        self.progress.status(&rel_path);
                        if hash_file(&file.path)? == *expected {
                            debug!("passed {}", rel_path);
                            report.passed.push(rel_path);
                        } else {
                            warn!("checksum mismatch: {}", rel_path);
                            report.failed.push(rel_path);
                        }
                    }
                }
            }
        }
        self.progress.finish();

        for set in [&mut report.passed, &mut report.failed, &mut report.new] {
            set.sort_by(|a, b| natord::compare(a, b));
        }
        report.missing_manifests.sort_by(|a, b| natord::compare(a, b));

        info!(
            "verified {}: {} passed, {} failed, {} new",
            root.display(),
            report.passed.len(),
            report.failed.len(),
            report.new.len()
        );
        Ok(report)
    }
}
