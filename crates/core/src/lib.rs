//! Hashkeep Core - checksum manifest primitives
//!
//! This crate provides the manifest format layer:
//! - MD5 content fingerprints
//! - Parsing and serializing the four checksum line formats
//! - Path normalization and re-rooting
//! - Whole-file manifest reads and append-only unique writes
//! - Versioned per-directory manifest slots (rotation)
//! - Uniqueness and per-directory partitioning of entries

pub mod codec;
pub mod dedup;
pub mod error;
pub mod hash;
pub mod manifest;
pub mod partition;
pub mod paths;
pub mod storage;

// Re-export main types for convenience
pub use codec::{LineFormat, ManifestLine, MAIN_HEADER, NESTED_HEADER};
pub use dedup::{partition_by_uniqueness, UniquenessPartition, UnsortedSourceIndex};
pub use error::{ManifestError, Result};
pub use hash::{hash_bytes, hash_file, Checksum, IncrementalHasher};
pub use manifest::ManifestKind;
pub use partition::{DirEntries, DirectoryIndex};
pub use storage::is_reserved;
