//! Path normalization for consistent file identities.
//!
//! Every document is keyed by an absolute, lexically normalized path so the
//! symbol index, the import graph and diagnostics agree on identity whether
//! a file was reached through a workspace scan or through an import URI.

use std::path::{Component, Path, PathBuf};

use super::constants::URI_SCHEMES;

/// Replace Windows separators with `/` and strip a leading URI scheme.
pub fn normalize_separators(raw: &str) -> String {
    let mut text = raw.trim();
    for scheme in URI_SCHEMES {
        if let Some(rest) = text.strip_prefix(scheme) {
            text = rest;
            break;
        }
    }
    text.replace('\\', "/")
}

/// Normalize a path into an absolute file identity.
///
/// Relative paths are joined onto the current directory. `.` and `..`
/// segments are folded lexically so paths that do not exist on disk (as in
/// in-memory workspaces) still compare equal.
pub fn normalize_path(path: &Path) -> PathBuf {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("/"))
            .join(path)
    };
    fold_components(&absolute)
}

/// Resolve a raw import URI against the file that contains the import.
pub fn resolve_relative(base_file: &Path, raw_uri: &str) -> PathBuf {
    let uri = normalize_separators(raw_uri);
    let target = Path::new(&uri);
    if target.is_absolute() {
        return fold_components(target);
    }
    let dir = base_file.parent().unwrap_or_else(|| Path::new("/"));
    normalize_path(&dir.join(target))
}

fn fold_components(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
