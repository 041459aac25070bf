//! Path normalization for manifest entries.
//!
//! Manifest paths are kept as `/`-separated strings so rules compare and
//! print identically on every platform; they only become [`PathBuf`]s when
//! joined onto a module or project root.
use std::path::{Component, Path, PathBuf};

/// Normalize a manifest path: strip leading and trailing separators, drop
/// empty and `.` segments, and join the rest with `/`.
///
/// `..` segments are kept; they are resolved against a real root later.
///
/// ```
/// use modlink_cli::manifest::paths::normalize;
///
/// assert_eq!(normalize("./app//etc/"), "app/etc");
/// assert_eq!(normalize("/"), "");
/// ```
#[must_use]
pub fn normalize(path: &str) -> String {
    path.split(std::path::is_separator)
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Resolve `.` and `..` components of `path` without touching the
/// filesystem.
///
/// `..` at the root is dropped, matching what the OS does for `/..`.
#[must_use]
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Express `path` relative to `root` as a `/`-separated string, or `None`
/// when `path` is not inside `root`.
#[must_use]
pub fn relative_to(path: &Path, root: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    Some(
        rel.components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
    )
}
