//! Action executor: applies planned actions to the filesystem

use crate::error::{Operation, SyncError};
use crate::sync::action::Action;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, instrument};
use walkdir::WalkDir;

/// Executor behavior switches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorOptions {
    /// Create missing parent directories for copy and move targets
    #[serde(default = "default_true")]
    pub create_parent_dirs: bool,
    /// Log actions instead of applying them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ExecutorOptions {
    fn default() -> Self {
        Self {
            create_parent_dirs: true,
            dry_run: false,
        }
    }
}

/// Applies actions in order, stopping at the first failure
///
/// Writes never go through a symlink: a link sitting at a copy or move
/// target is replaced, and when a destination root is set any symlinked
/// directory between the root and a touched path fails the action.
#[derive(Debug, Clone, Default)]
pub struct Executor {
    options: ExecutorOptions,
    root: Option<PathBuf>,
}

impl Executor {
    pub fn new(options: ExecutorOptions) -> Self {
        Self {
            options,
            root: None,
        }
    }

    /// Confine writes to `root`, refusing symlinked directories below it
    pub fn within(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn options(&self) -> &ExecutorOptions {
        &self.options
    }

    /// Apply a single action
    pub fn apply(&self, action: &Action) -> Result<(), SyncError> {
        if self.options.dry_run {
            info!(action = %action, "Dry run, skipping");
            return Ok(());
        }

        match action {
            Action::Copy { from, to } => {
                self.check_ancestors(to, Operation::Copy)?;
                self.ensure_parent(to)?;
                clear_target(to, Operation::Copy)?;
                fs::copy(from, to).map_err(|e| {
                    // Blame whichever side is actually missing
                    let path = if from.exists() { to } else { from };
                    SyncError::io(Operation::Copy, path, e)
                })?;
            }
            Action::Move { from, to } => {
                self.check_ancestors(from, Operation::Move)?;
                self.check_ancestors(to, Operation::Move)?;
                self.ensure_parent(to)?;
                clear_target(to, Operation::Move)?;
                fs::rename(from, to).map_err(|e| SyncError::io(Operation::Move, from, e))?;
            }
            Action::Delete { path } => {
                self.check_ancestors(path, Operation::Delete)?;
                fs::remove_file(path).map_err(|e| SyncError::io(Operation::Delete, path, e))?;
            }
        }

        debug!(action = %action, "Applied");
        Ok(())
    }

    /// Apply `actions` in list order
    ///
    /// Returns the applied actions. On failure at index `k`, actions before
    /// `k` have been applied, nothing after `k` has been attempted, and the
    /// error is [`SyncError::ActionFailed`] carrying `k` and the action.
    #[instrument(skip(self, actions), fields(count = actions.len(), dry_run = self.options.dry_run))]
    pub fn execute(&self, actions: &[Action]) -> Result<Vec<Action>, SyncError> {
        let mut applied = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            if let Err(e) = self.apply(action) {
                error!(index, action = %action, error = %e, "Action failed, stopping");
                return Err(SyncError::ActionFailed {
                    index,
                    action: action.clone(),
                    source: Box::new(e),
                });
            }
            applied.push(action.clone());
        }
        Ok(applied)
    }

    /// Fail if any directory strictly between the root and `path` is a symlink
    fn check_ancestors(&self, path: &Path, op: Operation) -> Result<(), SyncError> {
        let Some(root) = &self.root else {
            return Ok(());
        };
        for ancestor in path.ancestors().skip(1) {
            if ancestor == root.as_path() || !ancestor.starts_with(root) {
                break;
            }
            match fs::symlink_metadata(ancestor) {
                Ok(meta) if meta.file_type().is_symlink() => {
                    return Err(SyncError::SymlinkInPath(ancestor.to_path_buf()));
                }
                Ok(_) => {}
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(SyncError::io(op, ancestor, e)),
            }
        }
        Ok(())
    }

    fn ensure_parent(&self, target: &Path) -> Result<(), SyncError> {
        if !self.options.create_parent_dirs {
            return Ok(());
        }
        match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() && !parent.is_dir() => {
                fs::create_dir_all(parent)
                    .map_err(|e| SyncError::io(Operation::CreateDir, parent, e))
            }
            _ => Ok(()),
        }
    }
}

/// Make `target` writable as a regular file
///
/// A symlink at `target` is removed (never followed). A directory holding no
/// files, left behind once its contents moved away, is removed. A regular
/// file is left for the write to replace.
fn clear_target(target: &Path, op: Operation) -> Result<(), SyncError> {
    let meta = match fs::symlink_metadata(target) {
        Ok(meta) => meta,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(SyncError::io(op, target, e)),
    };

    if meta.file_type().is_symlink() {
        debug!(path = %target.display(), "Replacing symlink at target");
        return fs::remove_file(target).map_err(|e| SyncError::io(op, target, e));
    }

    if meta.is_dir() {
        for entry in WalkDir::new(target) {
            let entry = entry.map_err(|e| {
                let err = e
                    .into_io_error()
                    .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "walk failed"));
                SyncError::io(op, target, err)
            })?;
            if !entry.file_type().is_dir() {
                return Err(SyncError::io(
                    op,
                    target,
                    io::Error::new(io::ErrorKind::Other, "target is a non-empty directory"),
                ));
            }
        }
        debug!(path = %target.display(), "Removing empty directory at target");
        return fs::remove_dir_all(target).map_err(|e| SyncError::io(op, target, e));
    }

    Ok(())
}
