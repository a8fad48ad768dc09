//! Content-identity snapshot of one directory tree

use crate::types::ContentIdentity;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Mapping from content identity to the file name holding that content
///
/// Built by scanning a single root. Holds at most one name per identity: when
/// the tree contains several files with identical bytes, the one inserted
/// last wins and the earlier names are dropped. Iteration is in identity
/// order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeSnapshot {
    root: PathBuf,
    entries: BTreeMap<ContentIdentity, String>,
    #[serde(skip)]
    shadowed: usize,
}

impl TreeSnapshot {
    /// Create an empty snapshot for `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entries: BTreeMap::new(),
            shadowed: 0,
        }
    }

    /// Root directory this snapshot describes
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Record `name` as holding `identity`, returning the name it displaced
    pub fn insert(&mut self, identity: ContentIdentity, name: impl Into<String>) -> Option<String> {
        let previous = self.entries.insert(identity, name.into());
        if previous.is_some() {
            self.shadowed += 1;
        }
        previous
    }

    /// Name holding `identity`, if any
    pub fn get(&self, identity: &ContentIdentity) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    pub fn contains(&self, identity: &ContentIdentity) -> bool {
        self.entries.contains_key(identity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of files whose entry was overwritten by later identical content
    pub fn shadowed(&self) -> usize {
        self.shadowed
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ContentIdentity, &str)> {
        self.entries.iter().map(|(id, name)| (id, name.as_str()))
    }

    /// All file names in the snapshot
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }
}
