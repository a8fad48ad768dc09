//! Logging System
//!
//! Structured logging using the `tracing` crate. Provides configurable log
//! levels, output formats, and destinations. Command output goes to stdout,
//! so logs default to stderr.

use crate::error::SyncError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text (default: text)
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stdout, stderr, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path (required when output is "file")
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format only, stdout/stderr only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: BTreeMap::new(),
        }
    }
}

/// Where log lines are written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Stdout,
    Stderr,
    File,
}

/// Initialize the global subscriber
///
/// Priority order (highest to lowest):
/// 1. Environment variables (HASHSYNC_LOG, HASHSYNC_LOG_FORMAT, HASHSYNC_LOG_OUTPUT)
/// 2. The given configuration (CLI flags are already merged into it)
/// 3. Defaults
pub fn init_logging(config: &LoggingConfig) -> Result<(), SyncError> {
    let filter = build_env_filter(config)?;
    let format = determine_format(config)?;
    let destination = determine_destination(config)?;

    let writer = match destination {
        Destination::Stdout => BoxMakeWriter::new(std::io::stdout),
        Destination::Stderr => BoxMakeWriter::new(std::io::stderr),
        Destination::File => BoxMakeWriter::new(Mutex::new(open_log_file(config)?)),
    };
    let use_color = config.color && destination != Destination::File;

    let base_subscriber = Registry::default().with(filter);
    let result = if format == "json" {
        base_subscriber
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            )
            .try_init()
    } else {
        base_subscriber
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            )
            .try_init()
    };

    result.map_err(|e| SyncError::ConfigError(format!("Failed to initialize logging: {}", e)))
}

fn open_log_file(config: &LoggingConfig) -> Result<std::fs::File, SyncError> {
    let log_file = config.file.clone().ok_or_else(|| {
        SyncError::ConfigError("Log output 'file' requires a log file path".to_string())
    })?;

    if let Some(parent) = log_file.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                SyncError::ConfigError(format!("Failed to create log directory: {}", e))
            })?;
        }
    }
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_file)
        .map_err(|e| {
            SyncError::ConfigError(format!("Failed to open log file {:?}: {}", log_file, e))
        })
}

/// Build environment filter from config or environment variables
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, SyncError> {
    if let Ok(filter) = EnvFilter::try_from_env("HASHSYNC_LOG") {
        return Ok(filter);
    }

    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(&config.level).map_err(|e| {
        SyncError::ConfigError(format!("Invalid log level '{}': {}", config.level, e))
    })?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| SyncError::ConfigError(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}

/// Determine output format from config or environment
fn determine_format(config: &LoggingConfig) -> Result<String, SyncError> {
    if let Ok(format) = std::env::var("HASHSYNC_LOG_FORMAT") {
        if format == "json" || format == "text" {
            return Ok(format);
        }
    }

    parse_format(&config.format)
}

fn parse_format(format: &str) -> Result<String, SyncError> {
    match format {
        "json" | "text" => Ok(format.to_string()),
        other => Err(SyncError::ConfigError(format!(
            "Invalid log format: {} (must be 'json' or 'text')",
            other
        ))),
    }
}

/// Determine output destination from config or environment
fn determine_destination(config: &LoggingConfig) -> Result<Destination, SyncError> {
    if let Ok(output) = std::env::var("HASHSYNC_LOG_OUTPUT") {
        return parse_destination(&output);
    }

    parse_destination(&config.output)
}

fn parse_destination(output: &str) -> Result<Destination, SyncError> {
    match output {
        "stdout" => Ok(Destination::Stdout),
        "stderr" => Ok(Destination::Stderr),
        "file" => Ok(Destination::File),
        other => Err(SyncError::ConfigError(format!(
            "Invalid log output: {} (must be 'stdout', 'stderr', or 'file')",
            other
        ))),
    }
}

/// Check a logging config without installing anything
pub fn validate(config: &LoggingConfig) -> Result<(), String> {
    parse_format(&config.format).map_err(|e| e.to_string())?;
    let destination = parse_destination(&config.output).map_err(|e| e.to_string())?;
    if destination == Destination::File && config.file.is_none() {
        return Err("Log output 'file' requires a log file path".to_string());
    }
    if config.level != "off" && EnvFilter::try_new(&config.level).is_err() {
        return Err(format!("Invalid log level: {}", config.level));
    }
    Ok(())
}
