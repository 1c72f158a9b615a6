//! MD5 content fingerprints
//!
//! MD5 is used only to notice that file content changed or rotted. It is not
//! a security boundary.

use crate::error::{ManifestError, Result};
use md5::{Digest, Md5};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Length of a checksum rendered as hex
pub const CHECKSUM_HEX_LEN: usize = 32;

/// An MD5 digest (16 bytes)
///
/// Parsed from hex of either case and always rendered lowercase, so equality
/// between two checksums is case-insensitive with respect to their text.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Ord, PartialOrd)]
pub struct Checksum([u8; 16]);

impl Checksum {
    /// Create a new Checksum from bytes
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }

    /// Get the digest as a byte slice
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Convert to lowercase hex string
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from a 32 character hex string. Returns `None` for anything else.
    pub fn from_hex(text: &str) -> Option<Self> {
        if !is_checksum(text) {
            return None;
        }
        let mut bytes = [0u8; 16];
        hex::decode_to_slice(text, &mut bytes).ok()?;
        Some(Self(bytes))
    }
}

impl std::fmt::Debug for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Checksum({})", self.to_hex())
    }
}

impl std::fmt::Display for Checksum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// True if `text` is exactly 32 hex digits (`^[0-9a-fA-F]{32}$`)
pub fn is_checksum(text: &str) -> bool {
    text.len() == CHECKSUM_HEX_LEN && text.bytes().all(|b| b.is_ascii_hexdigit())
}

/// Hash bytes using MD5
pub fn hash_bytes(data: &[u8]) -> Checksum {
    Checksum::from_bytes(Md5::digest(data).into())
}

/// Hash a file using MD5, streaming it in fixed-size chunks
pub fn hash_file(path: &Path) -> Result<Checksum> {
    let file = File::open(path).map_err(|e| ManifestError::io(path, e))?;
    let mut reader = BufReader::new(file);
    let mut hasher = IncrementalHasher::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader
            .read(&mut buffer)
            .map_err(|e| ManifestError::io(path, e))?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    Ok(hasher.finalize())
}

/// Incremental hasher for building a checksum across multiple chunks
pub struct IncrementalHasher {
    inner: Md5,
}

impl IncrementalHasher {
    pub fn new() -> Self {
        Self { inner: Md5::new() }
    }

    pub fn update(&mut self, data: &[u8]) {
        self.inner.update(data);
    }

    pub fn finalize(self) -> Checksum {
        Checksum::from_bytes(self.inner.finalize().into())
    }
}

impl Default for IncrementalHasher {
    fn default() -> Self {
        Self::new()
    }
}
