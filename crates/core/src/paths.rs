//! Path normalization for manifest entries
//!
//! Manifest paths are plain strings with `/` separators. Root-relative paths
//! carry a leading `./`; the root directory itself is `.`.

use std::path::Path;
use unicode_normalization::UnicodeNormalization;

/// Apply Unicode NFC normalization
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}

/// Convert backslashes to `/` and drop trailing slashes (a lone `/` is kept)
pub fn clean(path: &str) -> String {
    let path = path.replace('\\', "/");
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() && !path.is_empty() {
        return "/".to_string();
    }
    trimmed.to_string()
}

/// Re-root `path` at the left-most occurrence of the directory `root_dir`.
///
/// Everything up to and including that directory segment is replaced by `./`.
/// `root_dir` may span several segments (`a/b`). If it does not occur as a
/// whole segment run, `path` is returned unchanged apart from NFC and slash
/// normalization.
///
/// ```
/// use hashkeep_core::paths::reroot;
///
/// assert_eq!(reroot("this/is/a/path", Some("is")), "./a/path");
/// assert_eq!(reroot("this/is/a/path", Some("missing")), "this/is/a/path");
/// ```
pub fn reroot(path: &str, root_dir: Option<&str>) -> String {
    let path = nfc(&path.replace('\\', "/"));
    let Some(root_dir) = root_dir else {
        return path;
    };

    let root_dir = nfc(&clean(root_dir));
    let needle: Vec<&str> = root_dir.split('/').filter(|s| !s.is_empty()).collect();
    if needle.is_empty() {
        return path;
    }

    let segments: Vec<&str> = path.split('/').collect();
    let found = segments
        .windows(needle.len())
        .position(|window| window == needle.as_slice());

    match found {
        Some(start) => {
            let rest = &segments[start + needle.len()..];
            let rest: Vec<&str> = rest.iter().copied().filter(|s| !s.is_empty()).collect();
            if rest.is_empty() {
                ".".to_string()
            } else {
                format!("./{}", rest.join("/"))
            }
        }
        None => path,
    }
}

/// Join two manifest paths. A leading `/` or `./` on `second` is dropped so
/// that it always lands inside `first`.
pub fn concat(first: &str, second: &str) -> String {
    let first = first.replace('\\', "/");
    let second = clean(second);
    let second = second
        .strip_prefix("./")
        .or_else(|| second.strip_prefix('/'))
        .unwrap_or(&second);

    if first.ends_with('/') {
        format!("{}{}", first, second)
    } else {
        format!("{}/{}", first, second)
    }
}

/// Split a manifest path into (dirpath, filename), like a POSIX dirname/basename
///
/// `./a/b.txt` gives `("./a", "b.txt")`, `./b.txt` gives `(".", "b.txt")` and a
/// bare `b.txt` gives `("", "b.txt")`.
pub fn split(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(idx) => (&path[..idx], &path[idx + 1..]),
        None => ("", path),
    }
}

/// Final component of a manifest path
pub fn basename(path: &str) -> &str {
    split(path).1
}

/// Root-relative manifest path (`.` or `./sub/dir`) of `dir` inside `root`
pub fn relative_dir(root: &Path, dir: &Path) -> String {
    let rel = dir.strip_prefix(root).unwrap_or(dir);
    let mut out = String::from(".");
    for component in rel.components() {
        out.push('/');
        out.push_str(&component.as_os_str().to_string_lossy());
    }
    nfc(&out)
}

/// Resolve a root-relative manifest path back onto the filesystem
pub fn to_fs_path(root: &Path, manifest_path: &str) -> std::path::PathBuf {
    let rel = manifest_path
        .strip_prefix("./")
        .unwrap_or(manifest_path)
        .trim_start_matches('/');
    if rel.is_empty() || rel == "." {
        return root.to_path_buf();
    }
    rel.split('/')
        .filter(|s| !s.is_empty())
        .fold(root.to_path_buf(), |acc, part| acc.join(part))
}
