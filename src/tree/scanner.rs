//! Tree scanner: walks a root and builds its content-identity snapshot

use crate::error::SyncError;
use crate::tree::hasher::{ContentHasher, DigestAlgorithm};
use crate::tree::snapshot::TreeSnapshot;
use crate::tree::walker::{FileEntry, Walker, WalkerConfig};
use crate::types::ContentIdentity;
use rayon::prelude::*;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, instrument, trace};

/// Builds [`TreeSnapshot`]s from directories on disk
#[derive(Debug, Clone)]
pub struct Scanner {
    hasher: ContentHasher,
    walker_config: WalkerConfig,
    parallel: bool,
}

impl Default for Scanner {
    fn default() -> Self {
        Self {
            hasher: ContentHasher::default(),
            walker_config: WalkerConfig::default(),
            parallel: true,
        }
    }
}

impl Scanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `algorithm` for content identities
    pub fn with_algorithm(mut self, algorithm: DigestAlgorithm) -> Self {
        self.hasher = ContentHasher::new(algorithm);
        self
    }

    /// Set walker config (symlinks, ignore patterns, depth)
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Hash files on the rayon pool instead of the calling thread
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.hasher.algorithm()
    }

    /// Scan `root` into a snapshot
    ///
    /// Hashes are computed (possibly in parallel) and then inserted in walk
    /// order, so with duplicate content the last file in walk order wins
    /// whether or not hashing ran in parallel. Any walk or hash failure fails
    /// the whole scan.
    #[instrument(skip(self, root), fields(root = %root.display(), algorithm = %self.hasher.algorithm()))]
    pub fn scan(&self, root: &Path) -> Result<TreeSnapshot, SyncError> {
        let start = Instant::now();

        let walker = Walker::with_config(root.to_path_buf(), self.walker_config.clone());
        let files = walker.walk()?;
        debug!(file_count = files.len(), "Walked tree");

        let hashed = if self.parallel {
            files
                .par_iter()
                .map(|file| self.hash_entry(file))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            files
                .iter()
                .map(|file| self.hash_entry(file))
                .collect::<Result<Vec<_>, _>>()?
        };

        let mut snapshot = TreeSnapshot::new(root);
        for (identity, name) in hashed {
            let short = identity.short().to_string();
            if let Some(displaced) = snapshot.insert(identity, name) {
                debug!(
                    identity = %short,
                    displaced = %displaced,
                    "Duplicate content, keeping later file"
                );
            }
        }

        info!(
            files = files.len(),
            identities = snapshot.len(),
            shadowed = snapshot.shadowed(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Scan complete"
        );

        Ok(snapshot)
    }

    /// Scan a source and destination root
    ///
    /// The two scans are independent and run concurrently when parallel.
    pub fn scan_pair(
        &self,
        source: &Path,
        dest: &Path,
    ) -> Result<(TreeSnapshot, TreeSnapshot), SyncError> {
        if self.parallel {
            let (source_snapshot, dest_snapshot) =
                rayon::join(|| self.scan(source), || self.scan(dest));
            Ok((source_snapshot?, dest_snapshot?))
        } else {
            Ok((self.scan(source)?, self.scan(dest)?))
        }
    }

    fn hash_entry(&self, file: &FileEntry) -> Result<(ContentIdentity, String), SyncError> {
        let identity = self.hasher.hash(&file.path)?;
        trace!(name = %file.name, size = file.size, identity = %identity.short(), "Hashed file");
        Ok((identity, file.name.clone()))
    }
}

/// Scan `root` with default settings
pub fn scan(root: &Path) -> Result<TreeSnapshot, SyncError> {
    Scanner::default().scan(root)
}
