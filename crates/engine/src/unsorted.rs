//! Loading an externally supplied checksum listing

use hashkeep_core::manifest;
use hashkeep_core::paths::basename;
use hashkeep_core::{partition_by_uniqueness, LineFormat, Result, UnsortedSourceIndex};
use std::path::Path;
use tracing::info;

/// Read a checksum listing in `format` and index it by file name.
///
/// Directory information in the listing is discarded; only the final path
/// component is used for lookups.
pub fn load_unsorted(path: &Path, format: LineFormat) -> Result<UnsortedSourceIndex> {
    let lines = manifest::read(path, format)?;
    let total = lines.len();

    let partition = partition_by_uniqueness(
        lines
            .into_iter()
            .map(|line| (basename(&line.path).to_string(), line.checksum)),
    );
    let index = UnsortedSourceIndex::new(partition);

    info!(
        "loaded {} entries from {}: {} unique names, {} ambiguous",
        total,
        path.display(),
        index.unique_len(),
        index.duplicate_names()
    );
    Ok(index)
}
