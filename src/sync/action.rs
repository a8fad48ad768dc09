//! Planned filesystem actions

use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// One filesystem mutation produced by the planner
///
/// Actions are plain data: they can be listed, logged, serialized or skipped
/// in a dry run without touching the filesystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum Action {
    /// Copy a source file's bytes to a new destination file
    Copy { from: PathBuf, to: PathBuf },
    /// Rename a destination file within the destination tree
    Move { from: PathBuf, to: PathBuf },
    /// Remove a destination file
    Delete { path: PathBuf },
}

/// Discriminant of an [`Action`], for counting and display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    Copy,
    Move,
    Delete,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::Copy { .. } => ActionKind::Copy,
            Action::Move { .. } => ActionKind::Move,
            Action::Delete { .. } => ActionKind::Delete,
        }
    }

    /// Destination-tree path this action writes or removes
    pub fn target(&self) -> &Path {
        match self {
            Action::Copy { to, .. } | Action::Move { to, .. } => to,
            Action::Delete { path } => path,
        }
    }

    /// Path read by this action, if any
    pub fn origin(&self) -> Option<&Path> {
        match self {
            Action::Copy { from, .. } | Action::Move { from, .. } => Some(from),
            Action::Delete { .. } => None,
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionKind::Copy => f.write_str("copy"),
            ActionKind::Move => f.write_str("move"),
            ActionKind::Delete => f.write_str("delete"),
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Copy { from, to } => {
                write!(f, "copy {} -> {}", from.display(), to.display())
            }
            Action::Move { from, to } => {
                write!(f, "move {} -> {}", from.display(), to.display())
            }
            Action::Delete { path } => write!(f, "delete {}", path.display()),
        }
    }
}

/// Per-kind action totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ActionCounts {
    pub copied: usize,
    pub moved: usize,
    pub deleted: usize,
}

impl ActionCounts {
    pub fn tally<'a>(actions: impl IntoIterator<Item = &'a Action>) -> Self {
        let mut counts = Self::default();
        for action in actions {
            match action.kind() {
                ActionKind::Copy => counts.copied += 1,
                ActionKind::Move => counts.moved += 1,
                ActionKind::Delete => counts.deleted += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> usize {
        self.copied + self.moved + self.deleted
    }
}
