//! Deriving per-directory manifests from the main manifest

use crate::hooks::{ProgressSink, TracingProgress};
use ahash::AHashMap;
use hashkeep_core::manifest::{self, ManifestKind};
use hashkeep_core::{paths, storage, Checksum, DirectoryIndex, Result};
use hashkeep_walker::{TreeWalker, WalkdirWalker};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Outcome of [`NestingEngine::nest`]
#[derive(Debug, Clone, Default)]
pub struct NestReport {
    /// Nested manifests written or merged into
    pub manifests: Vec<PathBuf>,
    /// Entry lines appended across all of them
    pub written: usize,
    /// Directories named in the main manifest that no longer exist
    pub missing_dirs: Vec<String>,
    /// The root had no main manifest, so nothing was done
    pub main_missing: bool,
}

/// Splits the main manifest into one nested manifest per directory
pub struct NestingEngine<W: TreeWalker = WalkdirWalker> {
    walker: W,
    progress: Box<dyn ProgressSink>,
}

impl NestingEngine {
    pub fn new() -> Self {
        Self::with_walker(WalkdirWalker::new())
    }
}

impl Default for NestingEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: TreeWalker> NestingEngine<W> {
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

    /// Write a nested manifest in every directory recorded under `root`.
    ///
    /// Directories are visited in the order they first appear in the main
    /// manifest. A main manifest holding two checksums for one file aborts
    /// with `DataConflict` before anything is written.
    pub fn nest(&self, root: &Path, updating_only: bool) -> Result<NestReport> {
        let main = root.join(ManifestKind::Main.filename());
        if !main.exists() {
            warn!("no main manifest at {}; nothing to nest", main.display());
            return Ok(NestReport {
                main_missing: true,
                ..NestReport::default()
            });
        }

        let entries = manifest::read_kind(&main, ManifestKind::Main)?;
        let index = DirectoryIndex::build(&entries)?;
        let on_disk: AHashMap<String, PathBuf> = self
            .walker
            .walk(root, false)?
            .into_iter()
            .map(|listing| (paths::relative_dir(root, &listing.dir), listing.dir))
            .collect();
        let mut report = NestReport::default();

        for (dirpath, files) in index.directories() {
            // Directories holding no files are not listed by the walker
            let dir = match on_disk.get(dirpath) {
                Some(dir) => dir.clone(),
                None => paths::to_fs_path(root, dirpath),
            };
            if !dir.is_dir() {
                warn!("{} is recorded but missing on disk", dirpath);
                report.missing_dirs.push(dirpath.to_string());
                continue;
            }

            let kind = ManifestKind::Nested;
            let lines: Vec<String> = std::iter::once(kind.header().to_string())
                .chain(
                    files
                        .iter()
                        .map(|(name, checksum)| kind.format().serialize(name, checksum, true)),
                )
                .collect();

            let target = storage::resolve(&dir, updating_only, kind)?;
            let fresh_file = !target.exists();
            let appended = manifest::append_unique(&target, &lines)?;
            report.written += if fresh_file { appended.saturating_sub(1) } else { appended };

            self.progress.status(dirpath);
            report.manifests.push(target);
        }
        self.progress.finish();

        info!(
            "nested {} entries into {} directories",
            report.written,
            report.manifests.len()
        );
        Ok(report)
    }
}

/// filename -> checksum from the nested manifest in `dir`, `None` if there is
/// no such file. The first entry wins when a name repeats.
pub fn read_nested(dir: &Path) -> Result<Option<AHashMap<String, Checksum>>> {
    let path = dir.join(ManifestKind::Nested.filename());
    if !path.exists() {
        return Ok(None);
    }

    let mut map = AHashMap::new();
    for line in manifest::read_kind(&path, ManifestKind::Nested)? {
        map.entry(paths::basename(&line.path).to_string())
            .or_insert(line.checksum);
    }
    debug!("read {} nested checksums from {}", map.len(), path.display());
    Ok(Some(map))
}
