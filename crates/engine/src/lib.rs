//! Manifest engines for hashkeep
//!
//! This crate provides the operations that work on whole trees:
//! - Generation of the main manifest, reusing nested and unsorted checksums
//! - Nesting: one manifest per directory derived from the main manifest
//! - Deletion of nested manifests through a caller-supplied removal sink
//! - Verification of files against main or nested manifests
//! - Pruning entries for files that no longer exist
//! - Export of a main manifest to TeraCopy or plain md5sum format

pub mod delete;
pub mod export;
pub mod generate;
pub mod hooks;
pub mod nest;
pub mod prune;
pub mod unsorted;
pub mod verify;

// Re-exports
pub use delete::{DeleteReport, DeletionEngine};
pub use export::export;
pub use generate::{ChecksumEngine, FailedChecksum, GenerateOptions, GenerateReport, SourceCounts};
pub use hooks::{
    AutoConfirm, Confirm, Deny, NoProgress, PermanentRemoval, ProgressSink, RemovalSink,
    TracingProgress,
};
pub use nest::{NestReport, NestingEngine};
pub use prune::{PruneReport, PruningEngine};
pub use unsorted::load_unsorted;
pub use verify::{VerificationEngine, VerifyOptions, VerifyReport};
