//! Filesystem walker for enumerating the regular files of a sync root

use crate::error::{Operation, SyncError};
use crate::tree::path;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{trace, warn};
use walkdir::{DirEntry, WalkDir};

/// A regular file found under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Absolute path of the file
    pub path: PathBuf,
    /// Path relative to the walked root, `/`-separated
    pub name: String,
    /// File size in bytes
    pub size: u64,
}

/// Filesystem walker configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalkerConfig {
    /// Whether to follow symbolic links (default: false)
    #[serde(default)]
    pub follow_symlinks: bool,
    /// Path components to prune (e.g., ".git"); empty by default
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
    /// Maximum depth to traverse (None = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Filesystem walker
pub struct Walker {
    root: PathBuf,
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given root path
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            config: WalkerConfig::default(),
        }
    }

    /// Create a walker with custom configuration
    pub fn with_config(root: PathBuf, config: WalkerConfig) -> Self {
        Self { root, config }
    }

    /// Walk the root and collect every regular file below it
    ///
    /// Directory entries are visited in file-name order, so the result is the
    /// same on every run over an unchanged tree. Symlinks that are not followed,
    /// sockets, fifos and device nodes are skipped, as are files whose relative
    /// name is not valid UTF-8. Any unreadable directory aborts the walk.
    pub fn walk(&self) -> Result<Vec<FileEntry>, SyncError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => SyncError::RootNotFound(self.root.clone()),
            _ => SyncError::io(Operation::Scan, &self.root, e),
        })?;
        if !metadata.is_dir() {
            return Err(SyncError::NotADirectory(self.root.clone()));
        }

        let mut entries = Vec::new();

        let walker = WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .max_depth(self.config.max_depth.unwrap_or(usize::MAX))
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.should_ignore(entry));

        for entry in walker {
            let entry = entry.map_err(|e| self.walk_error(e))?;

            if entry.depth() == 0 {
                continue;
            }

            if !entry.file_type().is_file() {
                if !entry.file_type().is_dir() {
                    trace!(path = %entry.path().display(), "Skipping non-regular file");
                }
                continue;
            }

            let Some(name) = path::relative_name(&self.root, entry.path()) else {
                warn!(path = %entry.path().display(), "Skipping file with non-UTF-8 name");
                continue;
            };

            let size = entry
                .metadata()
                .map_err(|e| self.walk_error(e))?
                .len();

            entries.push(FileEntry {
                path: entry.into_path(),
                name,
                size,
            });
        }

        Ok(entries)
    }

    /// Check if an entry should be ignored based on ignore patterns
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        if entry.depth() == 0 || self.config.ignore_patterns.is_empty() {
            return false;
        }
        let relative = entry.path().strip_prefix(&self.root).unwrap_or(entry.path());
        relative.components().any(|component| match component {
            std::path::Component::Normal(name) => {
                let name = name.to_string_lossy();
                self.config
                    .ignore_patterns
                    .iter()
                    .any(|pattern| pattern.as_str() == name)
            }
            _ => false,
        })
    }

    fn walk_error(&self, err: walkdir::Error) -> SyncError {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());
        let io_err = match err.into_io_error() {
            Some(io_err) => io_err,
            None => std::io::Error::new(
                std::io::ErrorKind::Other,
                "filesystem loop detected while following symlinks",
            ),
        };
        SyncError::io(Operation::Scan, path, io_err)
    }
}
