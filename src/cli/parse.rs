//! CLI parse: clap types for hashsync. No behavior; definitions only.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// hashsync CLI - content-addressed directory synchronization
#[derive(Parser)]
#[command(name = "hashsync", version)]
#[command(about = "Make a destination directory mirror a source, matching files by content")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (overrides default config loading)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (when output is "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

/// How command results are rendered on stdout
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable tables
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Synchronize DEST so it mirrors SOURCE
    Sync {
        /// Source directory (never modified)
        source: PathBuf,
        /// Destination directory
        dest: PathBuf,
        /// Show what would change without touching the destination
        #[arg(long)]
        dry_run: bool,
        #[command(flatten)]
        scan: ScanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the actions a sync would perform
    Plan {
        /// Source directory
        source: PathBuf,
        /// Destination directory
        dest: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the content-identity snapshot of a directory
    Scan {
        /// Directory to scan
        root: PathBuf,
        #[command(flatten)]
        scan: ScanArgs,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the content identity of files
    Hash {
        /// Files to hash
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Digest algorithm (sha1, blake3)
        #[arg(long)]
        algorithm: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Scan options shared by sync, plan and scan
#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Digest algorithm (sha1, blake3)
    #[arg(long)]
    pub algorithm: Option<String>,

    /// Follow symbolic links
    #[arg(long)]
    pub follow_symlinks: bool,

    /// Skip any path component with this name (repeatable)
    #[arg(long = "ignore", value_name = "NAME")]
    pub ignore: Vec<String>,

    /// Maximum directory depth
    #[arg(long)]
    pub max_depth: Option<usize>,

    /// Hash on the calling thread only
    #[arg(long)]
    pub no_parallel: bool,
}
