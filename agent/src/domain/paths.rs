//! Resolution of server-supplied log paths.
//!
//! Paths arrive in the inspection PC's native (Windows) form, so resolution
//! is purely textual and does not depend on the host the agent runs on.

/// A path is absolute when it has a drive marker (`C:`) or starts with a
/// root or UNC prefix (`\`, `/`).
#[must_use]
pub fn is_absolute_path(path: &str) -> bool {
    let bytes = path.as_bytes();
    let has_drive = bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':';
    has_drive || path.starts_with('\\') || path.starts_with('/')
}

/// Resolve `path` against `log_root` unless it is already absolute.
///
/// The separator follows the root: `\` when the root contains one, `/`
/// otherwise. An empty root leaves the path unchanged.
#[must_use]
pub fn resolve_log_path(log_root: &str, path: &str) -> String {
    if is_absolute_path(path) || log_root.is_empty() {
        return path.to_string();
    }
    let sep = if log_root.contains('\\') { '\\' } else { '/' };
    let root = log_root.trim_end_matches(['\\', '/']);
    format!("{root}{sep}{path}")
}
