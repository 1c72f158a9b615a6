//! Generate or extend the main manifest

use crate::config::{self, LOCAL_CONFIG};
use crate::progress::SpinnerProgress;
use crate::util;
use anyhow::{Context, Result};
use hashkeep_core::LineFormat;
use hashkeep_engine::{load_unsorted, ChecksumEngine, GenerateOptions};
use hashkeep_walker::IgnoreRules;
use owo_colors::OwoColorize;
use std::path::PathBuf;

pub struct Args {
    pub root: PathBuf,
    /// `None` defers to the config
    pub update: Option<bool>,
    pub unsorted: Option<PathBuf>,
    pub unsorted_format: LineFormat,
    pub ignore: Vec<String>,
    pub ignore_file: Option<PathBuf>,
}

pub fn run(args: Args) -> Result<()> {
    let root = util::resolve_root(&args.root)?;
    let (config, _) = config::load(&root)?;

    let mut ignore_config = config.ignore_for(&root);
    ignore_config.names.extend(args.ignore);
    ignore_config.names.push(LOCAL_CONFIG.to_string());
    if args.ignore_file.is_some() {
        ignore_config.file = args.ignore_file;
    }
    let ignore = IgnoreRules::load(&root, &ignore_config).context("Failed to load ignore rules")?;

    let unsorted = match &args.unsorted {
        Some(path) => Some(
            load_unsorted(path, args.unsorted_format)
                .with_context(|| format!("Failed to load unsorted listing: {}", path.display()))?,
        ),
        None => None,
    };

    let options = GenerateOptions {
        updating_only: args.update.unwrap_or(config.generate.updating_only),
        unsorted,
        ignore,
    };

    let report = ChecksumEngine::new()
        .progress(SpinnerProgress::new("hashing"))
        .generate(&root, &options)
        .context("Failed to generate manifest")?;

    println!("{}", "Manifest updated".green().bold());
    println!("{}: {}", "Location".dimmed(), report.manifest.display());
    println!("New lines:        {}", report.written.to_string().yellow());
    println!("Already recorded: {}", report.counts.recorded);
    println!("Hashed:           {}", report.counts.hashed + report.counts.verified);
    println!(
        "Reused:           {} {}",
        report.counts.nested + report.counts.unsorted,
        format!(
            "({} nested, {} unsorted)",
            report.counts.nested, report.counts.unsorted
        )
        .dimmed()
    );

    if !report.failed.is_empty() {
        println!();
        println!("{}", "Failed checksums (skipped this run):".red().bold());
        for failed in &report.failed {
            println!("  {}", failed);
        }
    }

    Ok(())
}
