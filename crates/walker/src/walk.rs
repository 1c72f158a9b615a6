//! walkdir-backed tree walker

use crate::{DirListing, TreeWalker, WalkedFile};
use ahash::AHashMap;
use hashkeep_core::paths::nfc;
use hashkeep_core::{ManifestError, Result};
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

/// Sequential depth-first walk. Directories come out before their
/// subdirectories, and entries are in natural order.
#[derive(Debug, Clone, Default)]
pub struct WalkdirWalker {
    follow_links: bool,
}

impl WalkdirWalker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow symbolic links (default: false)
    pub fn follow_links(mut self, follow: bool) -> Self {
        self.follow_links = follow;
        self
    }
}

impl TreeWalker for WalkdirWalker {
    fn walk(&self, root: &Path, top_level_only: bool) -> Result<Vec<DirListing>> {
        let mut walk = WalkDir::new(root)
            .follow_links(self.follow_links)
            .sort_by(|a, b| {
                natord::compare(&a.file_name().to_string_lossy(), &b.file_name().to_string_lossy())
            });
        if top_level_only {
            walk = walk.max_depth(1);
        }

        let mut listings: Vec<DirListing> = Vec::new();
        let mut positions: AHashMap<PathBuf, usize> = AHashMap::new();

        for entry in walk {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(root).to_path_buf();
                ManifestError::io(path, e.into())
            })?;

            let file_type = entry.file_type();
            if file_type.is_dir() {
                positions.insert(entry.path().to_path_buf(), listings.len());
                listings.push(DirListing {
                    dir: entry.path().to_path_buf(),
                    files: Vec::new(),
                });
            } else if file_type.is_file() {
                let Some(parent) = entry.path().parent() else {
                    continue;
                };
                if let Some(&idx) = positions.get(parent) {
                    listings[idx].files.push(WalkedFile {
                        name: nfc(&entry.file_name().to_string_lossy()),
                        path: entry.path().to_path_buf(),
                    });
                }
            }
        }

        listings.retain(|listing| !listing.files.is_empty());
        debug!("walked {}: {} directories with files", root.display(), listings.len());
        Ok(listings)
    }
}
