//! Directory tree walking for hashkeep
//!
//! This crate provides the tree-walker collaborator the engines depend on:
//! - The `TreeWalker` contract: (directory, files) pairs
//! - A walkdir-backed implementation with natural ordering
//! - Ignore rules (exact names, an ignore-names file, gitignore-style patterns)

pub mod ignore;
pub mod walk;

use std::path::PathBuf;

pub use crate::ignore::{IgnoreConfig, IgnoreRules};
pub use walk::WalkdirWalker;

/// A regular file found during a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalkedFile {
    /// NFC-normalized file name, as recorded in manifests
    pub name: String,
    /// Path on disk, as found
    pub path: PathBuf,
}

/// One directory and the regular files directly inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirListing {
    pub dir: PathBuf,
    pub files: Vec<WalkedFile>,
}

/// Source of (directory, files) pairs for a tree.
///
/// Directories without regular files are never yielded. Callers must not rely
/// on the order of directories or files.
pub trait TreeWalker {
    /// Walk `root`. With `top_level_only` only `root` itself is listed.
    fn walk(&self, root: &std::path::Path, top_level_only: bool) -> hashkeep_core::Result<Vec<DirListing>>;
}
