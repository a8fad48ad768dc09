//! Configuration System
//!
//! Layered configuration: built-in defaults, then the global config file (or an
//! explicit file), then `HASHSYNC_*` environment variables. CLI flags are
//! applied on top by the binary. Nothing here is needed to call
//! [`crate::sync::sync`]; the config only tunes scanning, execution and logging.

use crate::logging::{self, LoggingConfig};
use crate::sync::{ExecutorOptions, SyncOptions};
use crate::tree::hasher::DigestAlgorithm;
use crate::tree::walker::WalkerConfig;
use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::Path;

mod sources;

pub use sources::environment::ENV_PREFIX;
pub use sources::global_file::global_config_path;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashsyncConfig {
    /// Scanning settings
    #[serde(default)]
    pub scan: ScanConfig,

    /// Execution settings
    #[serde(default)]
    pub execute: ExecutorOptions,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Scanner configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Digest used for content identities
    #[serde(default)]
    pub algorithm: DigestAlgorithm,

    /// Follow symbolic links while walking
    #[serde(default)]
    pub follow_symlinks: bool,

    /// Path components to skip entirely
    #[serde(default)]
    pub ignore_patterns: Vec<String>,

    /// Maximum walk depth (unset = unlimited)
    #[serde(default)]
    pub max_depth: Option<usize>,

    /// Hash files and scan both roots in parallel
    #[serde(default = "default_true")]
    pub parallel: bool,
}

fn default_true() -> bool {
    true
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            algorithm: DigestAlgorithm::default(),
            follow_symlinks: false,
            ignore_patterns: Vec::new(),
            max_depth: None,
            parallel: true,
        }
    }
}

impl ScanConfig {
    pub fn walker_config(&self) -> WalkerConfig {
        WalkerConfig {
            follow_symlinks: self.follow_symlinks,
            ignore_patterns: self.ignore_patterns.clone(),
            max_depth: self.max_depth,
        }
    }

    /// Validate scan configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_depth == Some(0) {
            return Err("max_depth must be at least 1".to_string());
        }
        for pattern in &self.ignore_patterns {
            if pattern.trim().is_empty() {
                return Err("Ignore patterns cannot be empty".to_string());
            }
            if pattern.contains('/') || pattern.contains('\\') {
                return Err(format!(
                    "Ignore pattern '{}' must be a single path component",
                    pattern
                ));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Scan(String),
    Logging(String),
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Scan(msg) => write!(f, "Scan: {}", msg),
            ValidationError::Logging(msg) => write!(f, "Logging: {}", msg),
        }
    }
}

impl std::error::Error for ValidationError {}

impl HashsyncConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Err(e) = self.scan.validate() {
            errors.push(ValidationError::Scan(e));
        }
        if let Err(e) = logging::validate(&self.logging) {
            errors.push(ValidationError::Logging(e));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Synchronizer options described by this configuration
    pub fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            algorithm: self.scan.algorithm,
            walker: self.scan.walker_config(),
            parallel: self.scan.parallel,
            executor: self.execute,
        }
    }
}

/// Loads [`HashsyncConfig`] from its sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load from the global config file (if present) and the environment
    pub fn load() -> Result<HashsyncConfig, ConfigError> {
        let builder = sources::global_file::add_to_builder(Config::builder())?;
        let builder = sources::environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from an explicit TOML file (required) and the environment
    pub fn load_from_file(path: &Path) -> Result<HashsyncConfig, ConfigError> {
        let builder = Config::builder().add_source(File::from(path).format(FileFormat::Toml));
        let builder = sources::environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Load from `path` when given, otherwise from the default sources
    pub fn resolve(path: Option<&Path>) -> Result<HashsyncConfig, ConfigError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load(),
        }
    }
}
