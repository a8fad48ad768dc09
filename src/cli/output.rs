//! CLI output: error mapping from domain errors to the CLI surface.

use crate::cli::presentation::format_error;
use crate::error::SyncError;

/// Map domain errors to a string for CLI output.
pub fn map_error(e: &SyncError) -> String {
    format_error(e)
}
