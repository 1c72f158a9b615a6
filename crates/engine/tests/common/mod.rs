//! Shared fixtures for engine integration tests

#![allow(dead_code)]

use anyhow::Result;
use std::fs;
use std::path::Path;

pub const TEST1: &str = "./test1.txt -> c4ca4238a0b923820dcc509a6f75849b";
pub const TEST2: &str = "./test2.txt -> c81e728d9d4c2f636f067f89cc14862c";
pub const TEST11: &str = "./1/test11.txt -> 6512bd43d9caa6e02c990b0a82652dca";
pub const TEST121: &str = "./1/2/test121.txt -> 4c56ff4ce4aaf9573aa5dff913df997a";
pub const TEST122: &str = "./1/2/test122.txt -> c4ca4238a0b923820dcc509a6f75849b";
pub const TEST21: &str = "./2/test21.txt -> 3c59dc048e8850243be8079a5c74d079";
pub const TEST21_2: &str = "./1/2/test21.txt -> 3c59dc048e8850243be8079a5c74d079";

pub const MAIN_HEADER: &str = "; main_checksum";
pub const NESTED_HEADER: &str = "; nested_checksum";

/// Write `content` at `rel` under `root`, creating parent directories
pub fn write_file(root: &Path, rel: &str, content: &str) -> Result<()> {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}

/// Two files at the top level only
pub fn flat_tree(root: &Path) -> Result<()> {
    write_file(root, "test1.txt", "1")?;
    write_file(root, "test2.txt", "2")?;
    Ok(())
}

/// Three levels:
///
/// ```text
/// test1.txt  test2.txt
/// 1/test11.txt
/// 1/2/test121.txt  1/2/test122.txt
/// 2/test21.txt
/// ```
pub fn nested_tree(root: &Path) -> Result<()> {
    flat_tree(root)?;
    write_file(root, "1/test11.txt", "11")?;
    write_file(root, "1/2/test121.txt", "121")?;
    write_file(root, "1/2/test122.txt", "1")?;
    write_file(root, "2/test21.txt", "21")?;
    Ok(())
}

/// Lines of a text file without terminators
pub fn lines(path: &Path) -> Result<Vec<String>> {
    Ok(fs::read_to_string(path)?.lines().map(str::to_string).collect())
}

/// A header followed by `entries`, one per line, newline terminated
pub fn manifest_text(header: &str, entries: &[&str]) -> String {
    let mut text = format!("{}\n", header);
    for entry in entries {
        text.push_str(entry);
        text.push('\n');
    }
    text
}
