//! Verify files against manifests

use crate::progress::SpinnerProgress;
use crate::util;
use anyhow::{Context, Result};
use hashkeep_engine::{VerificationEngine, VerifyOptions, VerifyReport};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, nested: bool, top_level_only: bool, json: bool) -> Result<()> {
    let root = util::resolve_root(root)?;
    let options = VerifyOptions {
        use_nested: nested,
        top_level_only,
    };

    let progress = if json {
        SpinnerProgress::hidden()
    } else {
        SpinnerProgress::new("verifying")
    };
    let report = VerificationEngine::new()
        .progress(progress)
        .verify(&root, options)
        .context("Verification failed")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    if !report.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}

fn print_report(report: &VerifyReport) {
    if report.main_missing {
        println!("{}", "No main manifest found - nothing to verify".yellow());
        return;
    }

    for path in &report.failed {
        println!("{} {}", "FAILED".red().bold(), path);
    }
    for path in &report.new {
        println!("{}    {}", "NEW".cyan(), path);
    }

    println!();
    println!(
        "{} passed, {} failed, {} new",
        report.passed.len().to_string().green(),
        report.failed.len().to_string().red(),
        report.new.len().to_string().cyan()
    );

    if !report.missing_manifests.is_empty() {
        println!(
            "{}",
            format!(
                "{} directories had no nested manifest",
                report.missing_manifests.len()
            )
            .dimmed()
        );
    }
}
