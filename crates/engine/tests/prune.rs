mod common;

use anyhow::Result;
use common::*;
use hashkeep_engine::{
    AutoConfirm, ChecksumEngine, Deny, GenerateOptions, NestingEngine, PruningEngine,
};
use std::fs;
use tempfile::TempDir;

fn generated_flat_tree(root: &std::path::Path) -> Result<()> {
    flat_tree(root)?;
    ChecksumEngine::new().generate(root, &GenerateOptions::default())?;
    Ok(())
}

#[test]
fn test_prune_saving_original() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    generated_flat_tree(root)?;
    fs::remove_file(root.join("test1.txt"))?;

    let report = PruningEngine::new()
        .save_original(true)
        .prune(root, &mut AutoConfirm)?;

    assert_eq!(report.count(), 1);
    assert_eq!(report.removed, vec!["./test1.txt"]);
    assert_eq!(lines(&root.join(".main_checksum.txt"))?, vec![MAIN_HEADER, TEST2]);
    assert_eq!(
        lines(&root.join(".main_checksum_old.txt"))?,
        vec![MAIN_HEADER, TEST1, TEST2]
    );
    Ok(())
}

#[test]
fn test_prune_in_place() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    generated_flat_tree(root)?;
    fs::remove_file(root.join("test1.txt"))?;

    let report = PruningEngine::new().prune(root, &mut AutoConfirm)?;

    assert_eq!(report.count(), 1);
    assert_eq!(report.manifest, Some(root.join(".main_checksum.txt")));
    assert_eq!(lines(&root.join(".main_checksum.txt"))?, vec![MAIN_HEADER, TEST2]);
    assert!(!root.join(".main_checksum_old.txt").exists());
    Ok(())
}

#[test]
fn test_prune_declined_leaves_manifest_alone() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    generated_flat_tree(root)?;
    fs::remove_file(root.join("test1.txt"))?;
    let before = fs::read(root.join(".main_checksum.txt"))?;

    let report = PruningEngine::new()
        .save_original(true)
        .prune(root, &mut Deny)?;

    assert_eq!(report.count(), 0);
    assert_eq!(report.declined, vec!["./test1.txt"]);
    assert!(report.manifest.is_none());
    assert_eq!(fs::read(root.join(".main_checksum.txt"))?, before);
    assert!(!root.join(".main_checksum_old.txt").exists());
    Ok(())
}

#[test]
fn test_prune_asks_once_per_missing_file() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    nested_tree(root)?;
    ChecksumEngine::new().generate(root, &GenerateOptions::default())?;
    fs::remove_file(root.join("test1.txt"))?;
    fs::remove_file(root.join("1/2/test121.txt"))?;

    let mut asked = Vec::new();
    let mut keep_test1 = |description: &str| {
        asked.push(description.to_string());
        !description.contains("test1.txt")
    };
    let report = PruningEngine::new().prune(root, &mut keep_test1)?;

    assert_eq!(asked.len(), 2);
    assert_eq!(report.removed, vec!["./1/2/test121.txt"]);
    assert_eq!(
        lines(&root.join(".main_checksum.txt"))?,
        vec![MAIN_HEADER, TEST1, TEST2, TEST11, TEST122, TEST21]
    );
    Ok(())
}

#[test]
fn test_prune_leaves_nested_manifests() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    generated_flat_tree(root)?;
    NestingEngine::new().nest(root, false)?;
    let nested_before = fs::read(root.join(".nested_checksum.txt"))?;
    fs::remove_file(root.join("test1.txt"))?;

    PruningEngine::new().prune(root, &mut AutoConfirm)?;
    assert_eq!(fs::read(root.join(".nested_checksum.txt"))?, nested_before);
    Ok(())
}

#[test]
fn test_prune_without_main_manifest() -> Result<()> {
    let temp_dir = TempDir::new()?;
    flat_tree(temp_dir.path())?;

    let report = PruningEngine::new().prune(temp_dir.path(), &mut AutoConfirm)?;
    assert_eq!(report.count(), 0);
    Ok(())
}

#[test]
fn test_prune_keeps_decomposed_file_names() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let root = temp_dir.path();
    write_file(root, "cafe\u{301}.txt", "cafe")?;
    generated_flat_tree(root)?;
    let before = fs::read(root.join(".main_checksum.txt"))?;
    assert!(String::from_utf8_lossy(&before).contains("./caf\u{e9}.txt"));

    let report = PruningEngine::new().prune(root, &mut AutoConfirm)?;

    assert_eq!(report.count(), 0);
    assert!(report.manifest.is_none());
    assert_eq!(fs::read(root.join(".main_checksum.txt"))?, before);
    Ok(())
}
