//! Derive nested manifests

use crate::progress::SpinnerProgress;
use crate::util;
use anyhow::{Context, Result};
use hashkeep_engine::NestingEngine;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, update: bool) -> Result<()> {
    let root = util::resolve_root(root)?;

    let report = NestingEngine::new()
        .progress(SpinnerProgress::new("nesting"))
        .nest(&root, update)
        .context("Failed to write nested manifests")?;

    if report.main_missing {
        println!("{}", "No main manifest found - run `hk generate` first".yellow());
        return Ok(());
    }

    println!("{}", "Nested manifests written".green().bold());
    println!("Directories: {}", report.manifests.len().to_string().yellow());
    println!("New lines:   {}", report.written.to_string().yellow());

    if !report.missing_dirs.is_empty() {
        println!();
        println!("{}", "Recorded directories missing on disk:".yellow());
        for dir in &report.missing_dirs {
            println!("  {}", dir.dimmed());
        }
    }

    Ok(())
}
