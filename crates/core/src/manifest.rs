//! Reading and writing whole manifest files

use crate::codec::{clean_line, LineFormat, ManifestLine, MAIN_HEADER, NESTED_HEADER};
use crate::error::{ManifestError, Result};
use ahash::AHashSet;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// The two kinds of manifest this tool owns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    /// Root-level manifest covering a whole tree
    Main,
    /// Per-directory manifest covering only that directory's files
    Nested,
}

impl ManifestKind {
    pub const fn header(self) -> &'static str {
        match self {
            ManifestKind::Main => MAIN_HEADER,
            ManifestKind::Nested => NESTED_HEADER,
        }
    }

    /// Line format used for entries of this kind
    pub const fn format(self) -> LineFormat {
        match self {
            ManifestKind::Main => LineFormat::Custom,
            ManifestKind::Nested => LineFormat::CustomNested,
        }
    }

    /// Canonical file name inside the owning directory
    pub const fn filename(self) -> &'static str {
        match self {
            ManifestKind::Main => ".main_checksum.txt",
            ManifestKind::Nested => ".nested_checksum.txt",
        }
    }

    pub(crate) const fn stem(self) -> &'static str {
        match self {
            ManifestKind::Main => ".main_checksum",
            ManifestKind::Nested => ".nested_checksum",
        }
    }
}

/// Read every record of a checksum file.
///
/// Formats with a header must carry it as the exact first line. Blank lines
/// and `;` comment lines are skipped everywhere.
pub fn read(path: &Path, format: LineFormat) -> Result<Vec<ManifestLine>> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;

    if let Some(expected) = format.header() {
        if first_line(&content) != expected {
            return Err(ManifestError::HeaderMismatch {
                path: path.to_path_buf(),
                expected,
            });
        }
    }

    let mut lines = Vec::new();
    for raw in content.lines() {
        let line = clean_line(raw);
        if line.trim().is_empty() || line.starts_with(';') {
            continue;
        }
        lines.push(format.parse(&line, None)?);
    }
    Ok(lines)
}

/// Read a manifest of the given kind
pub fn read_kind(path: &Path, kind: ManifestKind) -> Result<Vec<ManifestLine>> {
    read(path, kind.format())
}

/// True if the file at `path` starts with the header of `kind`
pub fn has_header(path: &Path, kind: ManifestKind) -> Result<bool> {
    let content = fs::read_to_string(path).map_err(|e| ManifestError::io(path, e))?;
    Ok(first_line(&content) == kind.header())
}

/// Append `lines` to the file at `path`, skipping any line already present
/// verbatim. The file is created if missing. Returns the number of lines
/// written.
///
/// Re-running after an interrupted write converges on the same content.
pub fn append_unique<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<usize> {
    let existing = match fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
        Err(e) => return Err(ManifestError::io(path, e)),
    };

    let mut seen: AHashSet<String> = existing
        .as_deref()
        .map(|content| content.lines().map(str::to_string).collect())
        .unwrap_or_default();

    let mut out = String::new();
    if let Some(content) = &existing {
        if !content.is_empty() && !content.ends_with('\n') {
            out.push('\n');
        }
    }

    let mut written = 0;
    for line in lines {
        let line = line.as_ref();
        if seen.insert(line.to_string()) {
            out.push_str(line);
            out.push('\n');
            written += 1;
        }
    }

    if written == 0 && existing.is_some() {
        return Ok(0);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ManifestError::io(path, e))?;
    file.write_all(out.as_bytes())
        .map_err(|e| ManifestError::io(path, e))?;

    Ok(written)
}

/// Replace the file at `path` with `lines`.
///
/// Writes to a temporary file in the same directory and renames it over the
/// target, so readers never see a half-written manifest.
pub fn write_atomic<S: AsRef<str>>(path: &Path, lines: &[S]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| ManifestError::io(dir, e))?;
    for line in lines {
        writeln!(tmp, "{}", line.as_ref()).map_err(|e| ManifestError::io(tmp.path(), e))?;
    }
    tmp.as_file()
        .sync_all()
        .map_err(|e| ManifestError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| ManifestError::io(path, e.error))?;
    Ok(())
}

/// Render a manifest of `kind`: header first, then one line per entry
pub fn render(kind: ManifestKind, entries: &[ManifestLine], short: bool) -> Vec<String> {
    std::iter::once(kind.header().to_string())
        .chain(entries.iter().map(|e| e.to_line(kind.format(), short)))
        .collect()
}

fn first_line(content: &str) -> &str {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    content
        .lines()
        .next()
        .unwrap_or("")
}
