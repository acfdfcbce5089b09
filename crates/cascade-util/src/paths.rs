//! Lexical path algebra for URL re-anchoring.
//!
//! Everything in this module is pure path arithmetic: candidates are
//! joined, normalized and compared without consulting the file system,
//! so resolution succeeds even when the target does not exist on disk.
//!
//! # Resolution
//!
//! [`resolve`] joins a candidate against a base directory and collapses
//! `.`/`..` segments. Candidates containing characters no file system
//! accepts in a path are rejected by returning `None` - rejection is a
//! signal, never an error.
//!
//! # Relative paths
//!
//! [`make_relative`] computes the traversal from one absolute location
//! to another: longest common ancestor, then the necessary `..` segments
//! followed by the remaining components. The result always uses forward
//! slashes because it is destined for a URL, not a file-system call.

use std::path::{Component, Path, PathBuf};

/// Characters that are never valid inside a path reference, regardless of
/// host platform. Control characters are screened separately.
const INVALID_PATH_CHARS: &[char] = &['<', '>', '"', '|', '?', '*'];

/// Check whether a candidate contains a character no file system accepts
/// in a path.
pub fn has_invalid_path_chars(candidate: &str) -> bool {
    candidate
        .chars()
        .any(|c| c.is_control() || INVALID_PATH_CHARS.contains(&c))
}

/// Resolve a possibly-relative candidate against a base directory.
///
/// Returns the normalized absolute path, or `None` when the candidate is
/// empty or contains forbidden characters. The target is not required to
/// exist; this is lexical resolution only.
///
/// Root-relative candidates (leading `/`) are the caller's business to
/// exclude before calling - no special-casing happens here.
pub fn resolve(base_dir: &Path, candidate: &str) -> Option<PathBuf> {
    if candidate.is_empty() || has_invalid_path_chars(candidate) {
        return None;
    }
    Some(normalize(&base_dir.join(candidate)))
}

/// Collapse `.` and `..` segments without touching the file system.
///
/// A `..` that would climb past the root of an absolute path is dropped;
/// a `..` that climbs past the start of a relative path is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                normalized.push(component.as_os_str());
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() && normalized.as_os_str().is_empty() {
                    normalized.push(component.as_os_str());
                }
            }
            Component::Normal(part) => normalized.push(part),
        }
    }
    normalized
}

/// Compute the relative path from `from_dir` to `to`.
///
/// Both arguments are treated as already-normalized absolute paths
/// (`from_dir` a directory, `to` a file or directory). The result joins
/// its segments with `/` on every platform.
pub fn make_relative(from_dir: &Path, to: &Path) -> String {
    let from: Vec<Component<'_>> = from_dir.components().collect();
    let target: Vec<Component<'_>> = to.components().collect();

    let common = from
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut segments: Vec<String> = Vec::new();
    for _ in common..from.len() {
        segments.push("..".to_string());
    }
    for component in &target[common..] {
        segments.push(component.as_os_str().to_string_lossy().into_owned());
    }

    if segments.is_empty() {
        ".".to_string()
    } else {
        segments.join("/")
    }
}
