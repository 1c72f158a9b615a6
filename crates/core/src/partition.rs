//! Grouping manifest entries by parent directory

use crate::codec::ManifestLine;
use crate::error::{ManifestError, Result};
use crate::hash::Checksum;
use crate::paths;
use ahash::AHashMap;

/// Files recorded for one directory, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct DirEntries {
    checksums: AHashMap<String, Checksum>,
    order: Vec<String>,
}

impl DirEntries {
    pub fn get(&self, filename: &str) -> Option<&Checksum> {
        self.checksums.get(filename)
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.checksums.contains_key(filename)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// (filename, checksum) pairs in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Checksum)> {
        self.order
            .iter()
            .map(move |name| (name.as_str(), &self.checksums[name]))
    }
}

/// Manifest entries keyed by (dirpath, filename)
///
/// One filename under one directory has exactly one checksum; building an
/// index from entries that disagree fails with `DataConflict`.
#[derive(Debug, Clone, Default)]
pub struct DirectoryIndex {
    dirs: AHashMap<String, DirEntries>,
    order: Vec<String>,
}

impl DirectoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index from manifest entries
    pub fn build<'a, I>(entries: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ManifestLine>,
    {
        let mut index = Self::new();
        for entry in entries {
            index.insert(&entry.path, entry.checksum)?;
        }
        Ok(index)
    }

    /// Record `path`. Identical repeats are accepted silently.
    pub fn insert(&mut self, path: &str, checksum: Checksum) -> Result<()> {
        let (dirpath, filename) = paths::split(path);

        if !self.dirs.contains_key(dirpath) {
            self.order.push(dirpath.to_string());
        }
        let dir = self.dirs.entry(dirpath.to_string()).or_default();

        match dir.checksums.get(filename) {
            Some(existing) if *existing == checksum => Ok(()),
            Some(existing) => Err(ManifestError::DataConflict {
                dirpath: dirpath.to_string(),
                filename: filename.to_string(),
                first: existing.to_hex(),
                second: checksum.to_hex(),
            }),
            None => {
                dir.order.push(filename.to_string());
                dir.checksums.insert(filename.to_string(), checksum);
                Ok(())
            }
        }
    }

    pub fn get(&self, dirpath: &str) -> Option<&DirEntries> {
        self.dirs.get(dirpath)
    }

    pub fn contains(&self, dirpath: &str, filename: &str) -> bool {
        self.get(dirpath).is_some_and(|dir| dir.contains(filename))
    }

    /// Directories in first-seen order
    pub fn directories(&self) -> impl Iterator<Item = (&str, &DirEntries)> {
        self.order
            .iter()
            .map(move |dirpath| (dirpath.as_str(), &self.dirs[dirpath]))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
