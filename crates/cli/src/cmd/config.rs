//! Show the effective configuration

use crate::config::{self, LOCAL_CONFIG};
use crate::util;
use anyhow::Result;
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path) -> Result<()> {
    let root = util::resolve_root(root)?;
    let (config, source) = config::load(&root)?;

    println!("{}", "Hashkeep Configuration".bold());
    match &source {
        Some(path) => println!("{}: {}\n", "Location".dimmed(), path.display().dimmed()),
        None => {
            println!("{}", "No config file found, using defaults".dimmed());
            println!(
                "{}\n",
                format!(
                    "Searched: {}, {}",
                    root.join(LOCAL_CONFIG).display(),
                    config::global_config_path()
                        .map(|p| p.display().to_string())
                        .unwrap_or_else(|| "(no config dir)".to_string())
                )
                .dimmed()
            );
        }
    }

    println!("{}", "[ignore]".yellow());
    println!("  {} = {:?}", "names".cyan(), config.ignore.names);
    println!(
        "  {} = {}",
        "file".cyan(),
        config
            .ignore
            .file
            .as_ref()
            .map(|f| format!("{:?}", f.display().to_string()))
            .unwrap_or_else(|| "(none)".dimmed().to_string())
    );
    println!("  {} = {:?}", "patterns".cyan(), config.ignore.patterns);

    println!("\n{}", "[generate]".yellow());
    println!("  {} = {}", "updating_only".cyan(), config.generate.updating_only);

    println!("\n{}", "[prune]".yellow());
    println!("  {} = {}", "confirm".cyan(), config.prune.confirm);
    println!("  {} = {}", "save_original".cyan(), config.prune.save_original);

    Ok(())
}
