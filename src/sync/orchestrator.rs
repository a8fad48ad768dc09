//! Sync orchestrator: scan both trees, plan, execute

use crate::error::SyncError;
use crate::sync::action::{Action, ActionCounts};
use crate::sync::executor::{Executor, ExecutorOptions};
use crate::sync::planner;
use crate::tree::hasher::DigestAlgorithm;
use crate::tree::path::{canonicalize_root, overlaps};
use crate::tree::scanner::Scanner;
use crate::tree::snapshot::TreeSnapshot;
use crate::tree::walker::WalkerConfig;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, instrument};

/// Tuning knobs for one synchronizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
    pub algorithm: DigestAlgorithm,
    pub walker: WalkerConfig,
    pub parallel: bool,
    pub executor: ExecutorOptions,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            walker: WalkerConfig::default(),
            parallel: true,
            executor: ExecutorOptions::default(),
        }
    }
}

/// Outcome of a completed sync run
#[derive(Debug, Clone, Serialize)]
pub struct SyncResult {
    pub source: PathBuf,
    pub dest: PathBuf,
    pub dry_run: bool,
    /// Distinct identities found in the source tree
    pub source_identities: usize,
    /// Distinct identities found in the destination tree before the run
    pub dest_identities: usize,
    /// Actions applied (or planned, for a dry run), in order
    pub actions: Vec<Action>,
    pub counts: ActionCounts,
    pub started_at: DateTime<Utc>,
    pub elapsed_ms: u64,
}

impl SyncResult {
    /// True when the destination already mirrored the source
    pub fn was_converged(&self) -> bool {
        self.actions.is_empty()
    }
}

/// A scanned pair of trees and the plan between them
#[derive(Debug, Clone)]
pub struct SyncPlan {
    pub source: TreeSnapshot,
    pub dest: TreeSnapshot,
    pub actions: Vec<Action>,
}

/// Composes scanner, planner and executor into one operation
#[derive(Debug, Clone)]
pub struct Synchronizer {
    scanner: Scanner,
    executor: Executor,
}

impl Default for Synchronizer {
    fn default() -> Self {
        Self::new(SyncOptions::default())
    }
}

impl Synchronizer {
    pub fn new(options: SyncOptions) -> Self {
        let scanner = Scanner::new()
            .with_algorithm(options.algorithm)
            .with_walker_config(options.walker)
            .parallel(options.parallel);
        Self {
            scanner,
            executor: Executor::new(options.executor),
        }
    }

    /// Scan both roots and plan, without touching the filesystem
    #[instrument(skip(self, source, dest), fields(source = %source.display(), dest = %dest.display()))]
    pub fn plan(&self, source: &Path, dest: &Path) -> Result<SyncPlan, SyncError> {
        let (source_root, dest_root) = validate_roots(source, dest)?;
        let (source, dest) = self.scanner.scan_pair(&source_root, &dest_root)?;
        let actions = planner::plan(&source, &dest);
        Ok(SyncPlan {
            source,
            dest,
            actions,
        })
    }

    /// Make `dest` mirror `source`
    ///
    /// Fails fast: scan errors leave the destination untouched, and an
    /// execution error leaves exactly the actions before the failed one
    /// applied. Running again after a failure is safe.
    pub fn sync(&self, source: &Path, dest: &Path) -> Result<SyncResult, SyncError> {
        let started_at = Utc::now();
        let start = Instant::now();

        let plan = self.plan(source, dest)?;
        info!(
            planned = plan.actions.len(),
            dry_run = self.executor.options().dry_run,
            "Executing plan"
        );
        let actions = self
            .executor
            .clone()
            .within(plan.dest.root())
            .execute(&plan.actions)?;
        let counts = ActionCounts::tally(&actions);

        info!(
            copied = counts.copied,
            moved = counts.moved,
            deleted = counts.deleted,
            "Sync complete"
        );

        Ok(SyncResult {
            source: plan.source.root().to_path_buf(),
            dest: plan.dest.root().to_path_buf(),
            dry_run: self.executor.options().dry_run,
            source_identities: plan.source.len(),
            dest_identities: plan.dest.len(),
            actions,
            counts,
            started_at,
            elapsed_ms: start.elapsed().as_millis() as u64,
        })
    }
}

/// Sync `dest` onto `source` with default options
pub fn sync(source: &Path, dest: &Path) -> Result<SyncResult, SyncError> {
    Synchronizer::default().sync(source, dest)
}

fn validate_roots(source: &Path, dest: &Path) -> Result<(PathBuf, PathBuf), SyncError> {
    let source_root = canonicalize_root(source)?;
    let dest_root = canonicalize_root(dest)?;
    if overlaps(&source_root, &dest_root) {
        return Err(SyncError::OverlappingRoots {
            source_root,
            dest_root,
        });
    }
    Ok((source_root, dest_root))
}
