//! Export the main manifest

use crate::util;
use anyhow::{Context, Result};
use hashkeep_core::{LineFormat, ManifestKind};
use owo_colors::OwoColorize;
use std::path::Path;

pub fn run(root: &Path, output: &Path, format: LineFormat) -> Result<()> {
    if !matches!(format, LineFormat::Teracopy | LineFormat::Plain) {
        anyhow::bail!("Export supports teracopy and plain formats, not {}", format);
    }

    let root = util::resolve_root(root)?;
    let source = root.join(ManifestKind::Main.filename());
    let count = hashkeep_engine::export(&source, output, format)
        .with_context(|| format!("Failed to export {}", source.display()))?;

    println!(
        "{} {} entries to {} ({})",
        "Exported".green().bold(),
        count.to_string().yellow(),
        output.display(),
        format
    );
    Ok(())
}
