//! Per-directory manifest slots and rotation
//!
//! Each directory owns one canonical manifest file per kind. A fresh
//! (non-updating) write first renames the existing file aside:
//!
//! ```text
//! .main_checksum.txt          current
//! .main_checksum_old.txt      first rotation
//! .main_checksum_old_1.txt    second rotation
//! .main_checksum_old_2.txt    ...
//! ```
//!
//! The highest numbered rotated file is the most recent prior version.

use crate::error::{ManifestError, Result};
use crate::manifest::{self, ManifestKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// True for canonical manifest names and their rotated or numbered siblings
pub fn is_reserved(name: &str) -> bool {
    [ManifestKind::Main, ManifestKind::Nested]
        .into_iter()
        .any(|kind| suffix_of(name, kind).is_some_and(is_known_suffix))
}

/// Position of `name` in the rotation chain of `kind`: `_old` is 0, `_old_N`
/// is N. `None` for anything that is not a rotated file.
pub fn rotation_index(name: &str, kind: ManifestKind) -> Option<u32> {
    let suffix = suffix_of(name, kind)?;
    if suffix == "_old" {
        return Some(0);
    }
    let number = suffix.strip_prefix("_old_")?;
    if is_digits(number) {
        number.parse().ok()
    } else {
        None
    }
}

/// File name for rotation slot `index`
pub fn rotated_name(kind: ManifestKind, index: u32) -> String {
    if index == 0 {
        format!("{}_old.txt", kind.stem())
    } else {
        format!("{}_old_{}.txt", kind.stem(), index)
    }
}

/// Rotated versions of `kind` in `dir`, oldest first
pub fn rotated_versions(dir: &Path, kind: ManifestKind) -> Result<Vec<PathBuf>> {
    Ok(indexed_rotations(dir, kind)?
        .into_iter()
        .map(|(_, path)| path)
        .collect())
}

/// (rotation index, path) pairs sorted by index
fn indexed_rotations(dir: &Path, kind: ManifestKind) -> Result<Vec<(u32, PathBuf)>> {
    let read_dir = match fs::read_dir(dir) {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ManifestError::io(dir, e)),
    };

    let mut versions = Vec::new();
    for entry in read_dir {
        let entry = entry.map_err(|e| ManifestError::io(dir, e))?;
        let name = entry.file_name();
        if let Some(index) = name.to_str().and_then(|n| rotation_index(n, kind)) {
            versions.push((index, entry.path()));
        }
    }
    versions.sort_by_key(|(index, _)| *index);
    Ok(versions)
}

/// Work out which file a manifest of `kind` for `dir` should be read from or
/// written to.
///
/// - No canonical file: the canonical path is returned. In updating mode an
///   orphaned rotation (left by an interrupted rotate-then-write) is first
///   restored to the canonical name.
/// - Canonical file present: its header must match `kind`, otherwise the slot
///   belongs to something else and this fails with `HeaderMismatch`.
/// - `updating_only`: the existing canonical path is returned so new lines
///   merge into it.
/// - Otherwise the existing file is renamed to the slot after the highest
///   existing rotation and the now free canonical path is returned.
pub fn resolve(dir: &Path, updating_only: bool, kind: ManifestKind) -> Result<PathBuf> {
    let canonical = dir.join(kind.filename());

    if !canonical.exists() {
        if !updating_only {
            return Ok(canonical);
        }
        match rotated_versions(dir, kind)?.pop() {
            Some(orphan) => {
                warn!(
                    "{} is missing; restoring most recent rotation {}",
                    canonical.display(),
                    orphan.display()
                );
                fs::rename(&orphan, &canonical).map_err(|e| ManifestError::io(&orphan, e))?;
            }
            None => return Ok(canonical),
        }
    }

    if !manifest::has_header(&canonical, kind)? {
        return Err(ManifestError::HeaderMismatch {
            path: canonical,
            expected: kind.header(),
        });
    }

    if updating_only {
        return Ok(canonical);
    }

    let target = next_rotation_slot(dir, kind)?;
    fs::rename(&canonical, &target).map_err(|e| ManifestError::io(&canonical, e))?;
    info!("rotated {} to {}", canonical.display(), target.display());

    Ok(canonical)
}

/// One past the highest rotation present, so gaps left by deleted rotations
/// are never refilled
fn next_rotation_slot(dir: &Path, kind: ManifestKind) -> Result<PathBuf> {
    let index = match indexed_rotations(dir, kind)?.last() {
        Some((highest, _)) => highest + 1,
        None => 0,
    };
    Ok(dir.join(rotated_name(kind, index)))
}

/// The part of `name` between the kind's stem and `.txt`
fn suffix_of(name: &str, kind: ManifestKind) -> Option<&str> {
    name.strip_prefix(kind.stem())?.strip_suffix(".txt")
}

fn is_known_suffix(suffix: &str) -> bool {
    if suffix.is_empty() || suffix == "_old" {
        return true;
    }
    match suffix.strip_prefix('_') {
        Some(rest) => {
            is_digits(rest) || rest.strip_prefix("old_").is_some_and(is_digits)
        }
        None => false,
    }
}

fn is_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{MAIN_HEADER, NESTED_HEADER};
    use anyhow::Result;

    #[test]
    fn test_reserved_names() {
        assert!(is_reserved(".main_checksum.txt"));
        assert!(is_reserved(".nested_checksum.txt"));
        assert!(is_reserved(".main_checksum_old.txt"));
        assert!(is_reserved(".nested_checksum_old_3.txt"));
        assert!(is_reserved(".main_checksum_2.txt"));

        assert!(!is_reserved("main_checksum.txt"));
        assert!(!is_reserved(".main_checksum_older.txt"));
        assert!(!is_reserved(".main_checksum_old_.txt"));
        assert!(!is_reserved("notes.txt"));
    }

    #[test]
    fn test_rotation_index() {
        assert_eq!(rotation_index(".main_checksum_old.txt", ManifestKind::Main), Some(0));
        assert_eq!(rotation_index(".main_checksum_old_4.txt", ManifestKind::Main), Some(4));
        assert_eq!(rotation_index(".main_checksum.txt", ManifestKind::Main), None);
        assert_eq!(rotation_index(".main_checksum_old.txt", ManifestKind::Nested), None);
    }

    #[test]
    fn test_resolve_absent_returns_canonical() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        for updating in [true, false] {
            let path = resolve(temp_dir.path(), updating, ManifestKind::Main)?;
            assert_eq!(path, temp_dir.path().join(".main_checksum.txt"));
        }
        Ok(())
    }

    #[test]
    fn test_resolve_updating_keeps_existing() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let canonical = temp_dir.path().join(".main_checksum.txt");
        fs::write(&canonical, format!("{}\n", MAIN_HEADER))?;

        assert_eq!(resolve(temp_dir.path(), true, ManifestKind::Main)?, canonical);
        assert!(canonical.exists());
        assert!(rotated_versions(temp_dir.path(), ManifestKind::Main)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_resolve_rotates_without_overwriting() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let dir = temp_dir.path();
        let canonical = dir.join(".main_checksum.txt");

        for generation in 0..3 {
            fs::write(&canonical, format!("{}\n# gen {}\n", MAIN_HEADER, generation))?;
            assert_eq!(resolve(dir, false, ManifestKind::Main)?, canonical);
            assert!(!canonical.exists());
        }

        let versions = rotated_versions(dir, ManifestKind::Main)?;
        assert_eq!(
            versions,
            vec![
                dir.join(".main_checksum_old.txt"),
                dir.join(".main_checksum_old_1.txt"),
                dir.join(".main_checksum_old_2.txt"),
            ]
        );
        for (generation, version) in versions.iter().enumerate() {
            assert!(fs::read_to_string(version)?.contains(&format!("# gen {}", generation)));
        }
        Ok(())
    }

    #[test]
    fn test_resolve_rotates_past_deleted_rotation() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let dir = temp_dir.path();
        let canonical = dir.join(".main_checksum.txt");
        fs::write(dir.join(".main_checksum_old_1.txt"), format!("{}\n# older\n", MAIN_HEADER))?;
        fs::write(&canonical, format!("{}\n# newest\n", MAIN_HEADER))?;

        resolve(dir, false, ManifestKind::Main)?;
        assert!(!dir.join(".main_checksum_old.txt").exists());
        assert!(fs::read_to_string(dir.join(".main_checksum_old_2.txt"))?.contains("# newest"));

        resolve(dir, true, ManifestKind::Main)?;
        assert!(fs::read_to_string(&canonical)?.contains("# newest"));
        Ok(())
    }

    #[test]
    fn test_resolve_header_mismatch_is_fatal() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        fs::write(
            temp_dir.path().join(".nested_checksum.txt"),
            format!("{}\n", MAIN_HEADER),
        )?;

        let err = resolve(temp_dir.path(), false, ManifestKind::Nested).unwrap_err();
        assert!(matches!(err, ManifestError::HeaderMismatch { .. }));
        // nothing was renamed
        assert!(temp_dir.path().join(".nested_checksum.txt").exists());
        Ok(())
    }

    #[test]
    fn test_resolve_restores_orphaned_rotation_when_updating() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let dir = temp_dir.path();
        fs::write(dir.join(".nested_checksum_old.txt"), format!("{}\na\n", NESTED_HEADER))?;
        fs::write(dir.join(".nested_checksum_old_1.txt"), format!("{}\nb\n", NESTED_HEADER))?;

        let path = resolve(dir, true, ManifestKind::Nested)?;
        assert_eq!(path, dir.join(".nested_checksum.txt"));
        assert_eq!(fs::read_to_string(&path)?, format!("{}\nb\n", NESTED_HEADER));
        assert!(dir.join(".nested_checksum_old.txt").exists());
        assert!(!dir.join(".nested_checksum_old_1.txt").exists());
        Ok(())
    }

    #[test]
    fn test_resolve_fresh_write_leaves_orphans_alone() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let dir = temp_dir.path();
        fs::write(dir.join(".main_checksum_old.txt"), format!("{}\n", MAIN_HEADER))?;

        assert_eq!(resolve(dir, false, ManifestKind::Main)?, dir.join(".main_checksum.txt"));
        assert!(dir.join(".main_checksum_old.txt").exists());
        Ok(())
    }
}
