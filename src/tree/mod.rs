//! Directory trees as content-identity snapshots
//!
//! Walks a root, hashes every regular file, and maps each distinct content
//! identity to the name of the file holding it.

pub mod hasher;
pub mod path;
pub mod scanner;
pub mod snapshot;
pub mod walker;
