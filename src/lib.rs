//! hashsync: Content-Addressed Directory Synchronization
//!
//! Makes a destination directory mirror a source directory by matching files
//! on content identity rather than on name. Content already present in the
//! destination under another name is moved instead of copied again, content
//! absent from the source is deleted, and nothing in the source is modified.
//!
//! ```no_run
//! use std::path::Path;
//!
//! let result = hashsync::sync(Path::new("photos"), Path::new("/mnt/backup/photos"))?;
//! println!("{} actions applied", result.actions.len());
//! # Ok::<(), hashsync::SyncError>(())
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod sync;
pub mod tree;
pub mod types;

pub use config::{ConfigLoader, HashsyncConfig};
pub use error::{Operation, SyncError};
pub use sync::{
    plan, sync, Action, ActionCounts, Executor, ExecutorOptions, SyncOptions, SyncPlan,
    SyncResult, Synchronizer,
};
pub use tree::hasher::{hash_file, ContentHasher, DigestAlgorithm};
pub use tree::scanner::{scan, Scanner};
pub use tree::snapshot::TreeSnapshot;
pub use tree::walker::WalkerConfig;
pub use types::ContentIdentity;
