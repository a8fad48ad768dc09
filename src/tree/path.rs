//! Path canonicalization and relative-name utilities

use crate::error::{Operation, SyncError};
use std::path::{Component, Path, PathBuf};

/// Canonicalize a sync root
///
/// Resolves symlinks, `..` and `.`, and verifies the result is a directory.
/// Uses dunce so Windows roots do not turn into verbatim `\\?\` paths.
pub fn canonicalize_root(root: &Path) -> Result<PathBuf, SyncError> {
    let canonical = dunce::canonicalize(root).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => SyncError::RootNotFound(root.to_path_buf()),
        _ => SyncError::io(Operation::Scan, root, e),
    })?;

    if !canonical.is_dir() {
        return Err(SyncError::NotADirectory(root.to_path_buf()));
    }

    Ok(canonical)
}

/// Name of `path` relative to `root`, `/`-separated
///
/// Files directly under the root get their bare file name. Returns `None` when
/// `path` is not below `root` or any component is not valid UTF-8, since such a
/// name could not be joined back onto a root unchanged.
pub fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_str()?),
            _ => return None,
        }
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

/// Join a `/`-separated relative name onto a root
pub fn join_relative(root: &Path, name: &str) -> PathBuf {
    let mut path = root.to_path_buf();
    for part in name.split('/').filter(|p| !p.is_empty()) {
        path.push(part);
    }
    path
}

/// Whether either path contains the other (or they are equal)
pub fn overlaps(a: &Path, b: &Path) -> bool {
    a.starts_with(b) || b.starts_with(a)
}
