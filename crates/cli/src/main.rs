//! Hashkeep CLI - hk command

use anyhow::Result;
use clap::{Parser, Subcommand};
use hashkeep_core::LineFormat;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;
mod config;
mod progress;
mod util;

/// Hashkeep - checksum manifests that survive moves and catch bit rot
#[derive(Parser)]
#[command(name = "hk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or extend the main manifest of a tree
    Generate {
        /// Root of the tree (default: current directory)
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Merge into the existing manifest instead of rotating it aside
        #[arg(short, long, overrides_with = "no_update")]
        update: bool,

        /// Rotate the existing manifest aside even if the config says update
        #[arg(long, overrides_with = "update")]
        no_update: bool,

        /// Checksum listing to reuse before hashing
        #[arg(long)]
        unsorted: Option<PathBuf>,

        /// Format of the unsorted listing
        #[arg(long, default_value = "plain")]
        unsorted_format: LineFormat,

        /// File name to skip (repeatable)
        #[arg(short, long = "ignore")]
        ignore: Vec<String>,

        /// File listing names to skip, one per line
        #[arg(long)]
        ignore_file: Option<PathBuf>,
    },
    /// Write a nested manifest into every directory of the main manifest
    Nest {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Merge into existing nested manifests instead of rotating them aside
        #[arg(short, long)]
        update: bool,
    },
    /// Move every nested manifest under the tree to the trash
    DeleteNested {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Delete outright instead of using the trash
        #[arg(long)]
        permanent: bool,
    },
    /// Check files against their recorded checksums
    Verify {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Use per-directory nested manifests
        #[arg(short, long)]
        nested: bool,

        /// Only check files directly under the root
        #[arg(short, long)]
        top_level_only: bool,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// Drop manifest lines for files that no longer exist
    Prune {
        #[arg(default_value = ".")]
        root: PathBuf,

        /// Skip confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Keep the full manifest as a rotated copy
        #[arg(short, long, overrides_with = "no_save_original")]
        save_original: bool,

        /// Rewrite in place even if the config says save_original
        #[arg(long, overrides_with = "save_original")]
        no_save_original: bool,
    },
    /// Convert the main manifest to another tool's format
    Export {
        /// Output file (overwritten)
        output: PathBuf,

        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Target format: teracopy or plain
        #[arg(short, long, default_value = "teracopy")]
        format: LineFormat,
    },
    /// Show the effective configuration
    Config {
        #[arg(default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Generate {
            root,
            update,
            no_update,
            unsorted,
            unsorted_format,
            ignore,
            ignore_file,
        } => cmd::generate::run(cmd::generate::Args {
            root,
            update: util::flag_pair(update, no_update),
            unsorted,
            unsorted_format,
            ignore,
            ignore_file,
        }),
        Commands::Nest { root, update } => cmd::nest::run(&root, update),
        Commands::DeleteNested { root, permanent } => cmd::delete::run(&root, permanent),
        Commands::Verify {
            root,
            nested,
            top_level_only,
            json,
        } => cmd::verify::run(&root, nested, top_level_only, json),
        Commands::Prune {
            root,
            yes,
            save_original,
            no_save_original,
        } => cmd::prune::run(&root, yes, util::flag_pair(save_original, no_save_original)),
        Commands::Export {
            output,
            root,
            format,
        } => cmd::export::run(&root, &output, format),
        Commands::Config { root } => cmd::config::run(&root),
    }
}

/// `RUST_LOG` wins; otherwise warn, raised by each `-v`
fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
