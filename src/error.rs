//! Error types for the hashsync synchronization engine.

use crate::sync::action::Action;
use serde::Serialize;
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Filesystem operation that was running when an error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Scan,
    Hash,
    Copy,
    Move,
    Delete,
    CreateDir,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Scan => "scan",
            Operation::Hash => "hash",
            Operation::Copy => "copy",
            Operation::Move => "move",
            Operation::Delete => "delete",
            Operation::CreateDir => "create_dir",
        };
        f.write_str(name)
    }
}

/// Errors raised while scanning, planning or applying a sync
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Root directory not found: {0}")]
    RootNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Source and destination overlap: {source_root} and {dest_root}")]
    OverlappingRoots {
        source_root: PathBuf,
        dest_root: PathBuf,
    },

    #[error("Path not found during {op}: {path}")]
    NotFound {
        op: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Access denied during {op}: {path}")]
    AccessDenied {
        op: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error during {op} on {path}: {source}")]
    Io {
        op: Operation,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Refusing to write through symlink: {0}")]
    SymlinkInPath(PathBuf),

    #[error("Action #{index} failed ({action}): {source}")]
    ActionFailed {
        index: usize,
        action: Action,
        #[source]
        source: Box<SyncError>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl SyncError {
    /// Classify an I/O error raised by `op` on `path`.
    pub fn io(op: Operation, path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        match source.kind() {
            io::ErrorKind::NotFound => SyncError::NotFound { op, path, source },
            io::ErrorKind::PermissionDenied => SyncError::AccessDenied { op, path, source },
            _ => SyncError::Io { op, path, source },
        }
    }

    /// Path the error is about, if any.
    pub fn path(&self) -> Option<&Path> {
        match self {
            SyncError::RootNotFound(path)
            | SyncError::NotADirectory(path)
            | SyncError::SymlinkInPath(path) => Some(path),
            SyncError::NotFound { path, .. }
            | SyncError::AccessDenied { path, .. }
            | SyncError::Io { path, .. } => Some(path),
            SyncError::ActionFailed { source, .. } => source.path(),
            SyncError::OverlappingRoots { dest_root, .. } => Some(dest_root),
            SyncError::ConfigError(_) => None,
        }
    }

    /// Operation the error is about, if any.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            SyncError::NotFound { op, .. }
            | SyncError::AccessDenied { op, .. }
            | SyncError::Io { op, .. } => Some(*op),
            SyncError::ActionFailed { source, .. } => source.operation(),
            _ => None,
        }
    }
}

impl From<config::ConfigError> for SyncError {
    fn from(err: config::ConfigError) -> Self {
        SyncError::ConfigError(err.to_string())
    }
}
