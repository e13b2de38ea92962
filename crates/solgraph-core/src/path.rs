//! Path normalization and resolution
//!
//! Every canonical project path is computed here so that references read
//! from project files compare equal to the keys built from the manifest,
//! however the original string was spelled.

use std::path::{Component, MAIN_SEPARATOR, MAIN_SEPARATOR_STR, Path, PathBuf};

use crate::model::CanonicalPath;

const FOREIGN_SEPARATOR: char = if MAIN_SEPARATOR == '/' { '\\' } else { '/' };

/// Rewrite the other platform's separator to this platform's.
pub fn normalize(path: &str) -> String {
    path.replace(FOREIGN_SEPARATOR, MAIN_SEPARATOR_STR)
}

/// Resolve `relative` against `base_dir` into an absolute canonical path.
///
/// Absolute fragments replace the base. `.` and `..` are collapsed
/// lexically; the file system is never consulted.
pub fn resolve(base_dir: &Path, relative: &str) -> CanonicalPath {
    let fragment = normalize(relative);
    CanonicalPath::from_normalized(absolute(&base_dir.join(fragment)))
}

/// Anchor `path` at the working directory if needed and collapse it.
pub fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return collapse(path);
    }
    match std::env::current_dir() {
        Ok(cwd) => collapse(&cwd.join(path)),
        Err(e) => {
            tracing::warn!("Cannot determine working directory: {}", e);
            collapse(path)
        }
    }
}

fn collapse(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            // Popping past the root is a no-op, as on a real file system.
            Component::ParentDir => {
                out.pop();
            }
            Component::Normal(part) => out.push(part),
        }
    }
    out
}
