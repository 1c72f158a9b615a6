//! Error types for manifest handling

use crate::codec::LineFormat;
use std::path::PathBuf;
use thiserror::Error;

/// Structural and integrity failures. Each of these aborts the enclosing
/// operation; availability gaps are reported as data by the engines instead.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("line does not match {format} format: {line:?}")]
    Format { line: String, format: LineFormat },

    #[error("{} does not start with header {expected:?}", path.display())]
    HeaderMismatch { path: PathBuf, expected: &'static str },

    #[error("conflicting checksums for '{filename}' in '{dirpath}': {first} vs {second}")]
    DataConflict {
        dirpath: String,
        filename: String,
        first: String,
        second: String,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ManifestError {
    pub(crate) fn format(line: &str, format: LineFormat) -> Self {
        Self::Format {
            line: line.to_string(),
            format,
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type used throughout hashkeep-core
pub type Result<T> = std::result::Result<T, ManifestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_error_message_names_format() {
        let err = ManifestError::format("garbage", LineFormat::Teracopy);
        let msg = err.to_string();
        assert!(msg.contains("teracopy"), "unexpected message: {}", msg);
        assert!(msg.contains("garbage"));
    }

    #[test]
    fn test_data_conflict_message() {
        let err = ManifestError::DataConflict {
            dirpath: "./a".to_string(),
            filename: "b.txt".to_string(),
            first: "0".repeat(32),
            second: "1".repeat(32),
        };
        assert!(err.to_string().contains("'b.txt' in './a'"));
    }
}
