//! Checksum line formats
//!
//! | Format | Header | Line |
//! |---|---|---|
//! | `Plain` | none | `{checksum} ./{path}` (md5sum / `md5 -r`) |
//! | `Custom` | `; main_checksum` | `{path} -> {checksum}` |
//! | `CustomNested` | `; nested_checksum` | `{filename} -> {checksum}` |
//! | `Teracopy` | none | `{checksum} *{path}` |

use crate::error::{ManifestError, Result};
use crate::hash::{is_checksum, Checksum};
use crate::paths;
use std::fmt;
use std::str::FromStr;

/// Header line required at the top of a main manifest
pub const MAIN_HEADER: &str = "; main_checksum";
/// Header line required at the top of a nested manifest
pub const NESTED_HEADER: &str = "; nested_checksum";

const CUSTOM_SEPARATOR: &str = " -> ";
const TERACOPY_SEPARATOR: &str = " *";
const PLAIN_MARKER: &str = " ./";

/// One of the supported checksum line formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineFormat {
    Plain,
    Custom,
    CustomNested,
    Teracopy,
}

impl LineFormat {
    pub const ALL: [LineFormat; 4] = [
        LineFormat::Plain,
        LineFormat::Custom,
        LineFormat::CustomNested,
        LineFormat::Teracopy,
    ];

    /// Exact first line a file of this format must carry, if any
    pub fn header(self) -> Option<&'static str> {
        match self {
            LineFormat::Custom => Some(MAIN_HEADER),
            LineFormat::CustomNested => Some(NESTED_HEADER),
            LineFormat::Plain | LineFormat::Teracopy => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            LineFormat::Plain => "plain",
            LineFormat::Custom => "custom",
            LineFormat::CustomNested => "custom_nested",
            LineFormat::Teracopy => "teracopy",
        }
    }

    /// Structural check: is there a 32 hex digit checksum where this format
    /// expects one?
    pub fn validate(self, line: &str) -> bool {
        let line = clean_line(line);
        self.checksum_field(&line).is_some_and(is_checksum)
    }

    /// Extract the checksum of `line`
    pub fn extract_checksum(self, line: &str) -> Result<Checksum> {
        let cleaned = clean_line(line);
        self.checksum_field(&cleaned)
            .and_then(Checksum::from_hex)
            .ok_or_else(|| ManifestError::format(&cleaned, self))
    }

    /// Extract the path of `line`, optionally re-rooted at `reroot_dir`
    pub fn extract_path(self, line: &str, reroot_dir: Option<&str>) -> Result<String> {
        let cleaned = clean_line(line);
        if !self.checksum_field(&cleaned).is_some_and(is_checksum) {
            return Err(ManifestError::format(&cleaned, self));
        }

        let path = match self {
            LineFormat::Plain => cleaned
                .split_once(PLAIN_MARKER)
                .map(|(_, rest)| format!("./{}", rest)),
            LineFormat::Custom | LineFormat::CustomNested => cleaned
                .rsplit_once(CUSTOM_SEPARATOR)
                .map(|(path, _)| path.to_string()),
            LineFormat::Teracopy => cleaned
                .split_once(TERACOPY_SEPARATOR)
                .map(|(_, path)| path.to_string()),
        }
        .ok_or_else(|| ManifestError::format(&cleaned, self))?;

        Ok(paths::reroot(&path, reroot_dir))
    }

    /// Parse a whole line into a [`ManifestLine`]
    pub fn parse(self, line: &str, reroot_dir: Option<&str>) -> Result<ManifestLine> {
        Ok(ManifestLine {
            path: self.extract_path(line, reroot_dir)?,
            checksum: self.extract_checksum(line)?,
        })
    }

    /// Render one line (without trailing newline).
    ///
    /// `short` keeps only the filename, as nested manifests do. Plain paths
    /// are written verbatim and must already start with `./` to parse back.
    pub fn serialize(self, path: &str, checksum: &Checksum, short: bool) -> String {
        let path = if short { paths::basename(path) } else { path };
        match self {
            LineFormat::Plain => format!("{} {}", checksum, path),
            LineFormat::Custom | LineFormat::CustomNested => {
                format!("{}{}{}", path, CUSTOM_SEPARATOR, checksum)
            }
            LineFormat::Teracopy => format!("{}{}{}", checksum, TERACOPY_SEPARATOR, path),
        }
    }

    /// The text where this format keeps its checksum, if the line has that shape
    fn checksum_field(self, cleaned: &str) -> Option<&str> {
        match self {
            LineFormat::Plain => cleaned.split_whitespace().next(),
            LineFormat::Custom | LineFormat::CustomNested => cleaned
                .rsplit_once(CUSTOM_SEPARATOR)
                .map(|(_, checksum)| checksum),
            LineFormat::Teracopy => cleaned
                .split_once(TERACOPY_SEPARATOR)
                .map(|(checksum, _)| checksum),
        }
    }
}

impl fmt::Display for LineFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LineFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "md5" | "md5sum" => Ok(LineFormat::Plain),
            "custom" => Ok(LineFormat::Custom),
            "custom_nested" | "custom-nested" | "nested" => Ok(LineFormat::CustomNested),
            "teracopy" => Ok(LineFormat::Teracopy),
            other => Err(format!(
                "unknown format '{}' (expected plain, custom, custom_nested or teracopy)",
                other
            )),
        }
    }
}

/// One (path, checksum) record
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ManifestLine {
    /// Slash separated path; root-relative paths start with `./`
    pub path: String,
    pub checksum: Checksum,
}

impl ManifestLine {
    pub fn new(path: impl Into<String>, checksum: Checksum) -> Self {
        Self {
            path: path.into(),
            checksum,
        }
    }

    pub fn to_line(&self, format: LineFormat, short: bool) -> String {
        format.serialize(&self.path, &self.checksum, short)
    }
}

/// NFC-normalize, strip line terminators and a BOM, and turn `\` into `/`
pub fn clean_line(line: &str) -> String {
    let line = line.strip_prefix('\u{feff}').unwrap_or(line);
    paths::nfc(line)
        .replace(['\n', '\r'], "")
        .replace('\\', "/")
}
