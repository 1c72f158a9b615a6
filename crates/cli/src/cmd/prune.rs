//! Prune entries for missing files

use crate::config;
use crate::util::{self, PromptConfirm};
use anyhow::{Context, Result};
use hashkeep_engine::{AutoConfirm, Confirm, PruningEngine};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, yes: bool, save_original: Option<bool>) -> Result<()> {
    let root = util::resolve_root(root)?;
    let (config, _) = config::load(&root)?;

    let mut confirm: Box<dyn Confirm> = if yes || !config.prune.confirm {
        Box::new(AutoConfirm)
    } else {
        Box::new(PromptConfirm::new())
    };

    let report = PruningEngine::new()
        .save_original(save_original.unwrap_or(config.prune.save_original))
        .prune(&root, confirm.as_mut())
        .context("Failed to prune manifest")?;

    if report.count() == 0 {
        println!("{}", "Nothing pruned".dimmed());
    } else {
        println!(
            "{} {} lines",
            "Pruned".green().bold(),
            report.count().to_string().yellow()
        );
        for path in &report.removed {
            println!("  {}", path.dimmed());
        }
    }
    if !report.declined.is_empty() {
        println!("Kept {} missing entries", report.declined.len());
    }

    Ok(())
}
