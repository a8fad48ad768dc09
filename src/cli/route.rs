//! CLI route: single route table and run context. Dispatches to the sync
//! services and presentation.

use crate::cli::parse::{Commands, ScanArgs};
use crate::cli::presentation::{format_hashes, format_plan, format_snapshot, format_sync_result};
use crate::config::{ConfigLoader, HashsyncConfig};
use crate::error::SyncError;
use crate::sync::Synchronizer;
use crate::tree::hasher::{ContentHasher, DigestAlgorithm};
use crate::tree::path::canonicalize_root;
use crate::tree::scanner::Scanner;
use std::path::PathBuf;
use tracing::debug;

/// Runtime context for CLI execution: the effective configuration.
/// Built from an optional config path using ConfigLoader only.
pub struct RunContext {
    config: HashsyncConfig,
}

impl RunContext {
    /// Create run context from an optional config path.
    pub fn new(config_path: Option<PathBuf>) -> Result<Self, SyncError> {
        let config = ConfigLoader::resolve(config_path.as_deref())?;
        Ok(Self::with_config(config))
    }

    pub fn with_config(config: HashsyncConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &HashsyncConfig {
        &self.config
    }

    /// Execute a command and return its rendered output.
    pub fn execute(&self, command: &Commands) -> Result<String, SyncError> {
        match command {
            Commands::Sync {
                source,
                dest,
                dry_run,
                scan,
                format,
            } => {
                let mut config = self.effective_config(scan)?;
                if *dry_run {
                    config.execute.dry_run = true;
                }
                let result = Synchronizer::new(config.sync_options()).sync(source, dest)?;
                format_sync_result(&result, *format)
            }
            Commands::Plan {
                source,
                dest,
                scan,
                format,
            } => {
                let config = self.effective_config(scan)?;
                let plan = Synchronizer::new(config.sync_options()).plan(source, dest)?;
                format_plan(&plan, *format)
            }
            Commands::Scan { root, scan, format } => {
                let config = self.effective_config(scan)?;
                let root = canonicalize_root(root)?;
                let snapshot = Scanner::new()
                    .with_algorithm(config.scan.algorithm)
                    .with_walker_config(config.scan.walker_config())
                    .parallel(config.scan.parallel)
                    .scan(&root)?;
                format_snapshot(&snapshot, *format)
            }
            Commands::Hash {
                files,
                algorithm,
                format,
            } => {
                let algorithm = match algorithm {
                    Some(name) => name.parse::<DigestAlgorithm>()?,
                    None => self.config.scan.algorithm,
                };
                let hasher = ContentHasher::new(algorithm);
                let hashes = files
                    .iter()
                    .map(|path| Ok((path.clone(), hasher.hash(path)?)))
                    .collect::<Result<Vec<_>, SyncError>>()?;
                format_hashes(&hashes, *format)
            }
            Commands::Config => toml::to_string_pretty(&self.config).map_err(|e| {
                SyncError::ConfigError(format!("Failed to render configuration: {}", e))
            }),
        }
    }

    /// Loaded configuration with command-line scan flags applied, validated.
    fn effective_config(&self, args: &ScanArgs) -> Result<HashsyncConfig, SyncError> {
        let mut config = self.config.clone();
        apply_scan_args(&mut config, args)?;
        config.validate().map_err(|errors| {
            SyncError::ConfigError(
                errors
                    .iter()
                    .map(|e| e.to_string())
                    .collect::<Vec<_>>()
                    .join("; "),
            )
        })?;
        debug!(algorithm = %config.scan.algorithm, parallel = config.scan.parallel, "Effective scan configuration");
        Ok(config)
    }
}

fn apply_scan_args(config: &mut HashsyncConfig, args: &ScanArgs) -> Result<(), SyncError> {
    if let Some(ref algorithm) = args.algorithm {
        config.scan.algorithm = algorithm.parse()?;
    }
    if args.follow_symlinks {
        config.scan.follow_symlinks = true;
    }
    config.scan.ignore_patterns.extend(args.ignore.iter().cloned());
    if args.max_depth.is_some() {
        config.scan.max_depth = args.max_depth;
    }
    if args.no_parallel {
        config.scan.parallel = false;
    }
    Ok(())
}
