//! Remove nested manifests

use crate::util::{self, TrashRemoval};
use anyhow::{Context, Result};
use hashkeep_engine::{DeletionEngine, PermanentRemoval, RemovalSink};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, permanent: bool) -> Result<()> {
    let root = util::resolve_root(root)?;

    let mut removal: Box<dyn RemovalSink> = if permanent {
        Box::new(PermanentRemoval)
    } else {
        Box::new(TrashRemoval)
    };
    let report = DeletionEngine::new()
        .delete_nested(&root, removal.as_mut())
        .context("Failed to delete nested manifests")?;

    let verb = if permanent { "Deleted" } else { "Trashed" };
    println!("{} {} nested manifests", verb, report.removed.len().to_string().yellow());

    if !report.mismatched.is_empty() {
        println!();
        println!("{}", "Left in place (unexpected header, review manually):".red().bold());
        for path in &report.mismatched {
            println!("  {}", path.display());
        }
    }

    Ok(())
}
