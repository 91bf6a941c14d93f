//! Path utilities.
//!
//! Storage-root resolution and safe path handling for scope-relative files.

use std::path::{Path, PathBuf};

/// Name of the project-local history directory.
pub const PROJECT_DIR_NAME: &str = ".palimpsest";

/// Get the global palimpsest data directory.
///
/// This follows XDG conventions:
/// - `$XDG_DATA_HOME/palimpsest` if set
/// - `~/.local/share/palimpsest` otherwise
pub fn data_dir() -> Option<PathBuf> {
    dirs::data_local_dir().map(|p| p.join("palimpsest"))
}

/// Get the global palimpsest configuration directory.
pub fn config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("palimpsest"))
}

/// Get the palimpsest logs directory.
pub fn logs_dir() -> Option<PathBuf> {
    config_dir().map(|p| p.join("logs"))
}

/// Get the project-local history directory for a project root.
pub fn project_history_dir(project_root: &Path) -> PathBuf {
    project_root.join(PROJECT_DIR_NAME)
}

/// Normalize a path by removing `.` and `..` components.
///
/// Unlike `canonicalize`, this doesn't require the path to exist.
pub fn normalize(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();

    for component in path.components() {
        match component {
            std::path::Component::ParentDir => {
                result.pop();
            }
            std::path::Component::CurDir => {}
            _ => {
                result.push(component);
            }
        }
    }

    result
}

/// Check if a path is within a base directory.
pub fn is_within(path: &Path, base: &Path) -> bool {
    let canonical_path = path.canonicalize().ok();
    let canonical_base = base.canonicalize().ok();

    match (canonical_path, canonical_base) {
        (Some(p), Some(b)) => p.starts_with(&b),
        // Fall back to a lexical prefix check when paths don't exist yet
        _ => path.starts_with(base),
    }
}

/// Make a path relative to a base directory.
///
/// Returns `None` if the path is not within the base directory.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(|p| p.to_path_buf())
}

/// Join a scope-relative path onto a base directory, preventing traversal.
///
/// Returns `None` if the resulting path would escape the base.
pub fn safe_join(base: &Path, path: &Path) -> Option<PathBuf> {
    let normalized = normalize(&base.join(path));

    if is_within(&normalized, base) {
        Some(normalized)
    } else {
        None
    }
}
