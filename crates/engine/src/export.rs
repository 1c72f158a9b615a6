//! Converting a main manifest for other tools

use hashkeep_core::manifest::{self, ManifestKind};
use hashkeep_core::{LineFormat, Result};
use std::path::Path;
use tracing::info;

/// Comment lines TeraCopy puts at the top of its `.md5` files
pub const TERACOPY_PREAMBLE: [&str; 3] = ["; MD5 checksums created by TeraCopy", "; teracopy.com", ""];

/// Write the entries of the main manifest at `source` to `target` in
/// `format`, replacing `target`. Returns the number of entries written.
///
/// Paths are copied verbatim, so a plain export keeps the `./` marker that
/// main manifest paths already carry.
pub fn export(source: &Path, target: &Path, format: LineFormat) -> Result<usize> {
    let entries = manifest::read_kind(source, ManifestKind::Main)?;

    let preamble: Vec<String> = match format {
        LineFormat::Teracopy => TERACOPY_PREAMBLE.iter().map(|s| s.to_string()).collect(),
        other => other.header().map(str::to_string).into_iter().collect(),
    };
    let lines: Vec<String> = preamble
        .into_iter()
        .chain(entries.iter().map(|entry| entry.to_line(format, false)))
        .collect();

    manifest::write_atomic(target, &lines)?;
    info!(
        "exported {} entries from {} to {} ({})",
        entries.len(),
        source.display(),
        target.display(),
        format
    );
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::fs;

    const MAIN: &str = "; main_checksum\n\
        ./test1.txt -> c4ca4238a0b923820dcc509a6f75849b\n\
        ./1/test11.txt -> 6512bd43d9caa6e02c990b0a82652dca\n";

    #[test]
    fn test_teracopy_export() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let source = temp_dir.path().join(".main_checksum.txt");
        let target = temp_dir.path().join("out.md5");
        fs::write(&source, MAIN)?;
        fs::write(&target, "stale")?;

        assert_eq!(export(&source, &target, LineFormat::Teracopy)?, 2);
        assert_eq!(
            fs::read_to_string(&target)?,
            "; MD5 checksums created by TeraCopy\n; teracopy.com\n\n\
             c4ca4238a0b923820dcc509a6f75849b *./test1.txt\n\
             6512bd43d9caa6e02c990b0a82652dca *./1/test11.txt\n"
        );

        let back = manifest::read(&target, LineFormat::Teracopy)?;
        assert_eq!(back[1].path, "./1/test11.txt");
        Ok(())
    }

    #[test]
    fn test_plain_export_parses_back() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let source = temp_dir.path().join(".main_checksum.txt");
        let target = temp_dir.path().join("out.md5");
        fs::write(&source, MAIN)?;

        export(&source, &target, LineFormat::Plain)?;
        let content = fs::read_to_string(&target)?;
        assert!(content.starts_with("c4ca4238a0b923820dcc509a6f75849b ./test1.txt\n"));

        let back = manifest::read(&target, LineFormat::Plain)?;
        assert_eq!(back, manifest::read_kind(&source, ManifestKind::Main)?);
        Ok(())
    }
}
