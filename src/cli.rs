//! CLI domain: parse, route, output, and presentation only.
//! No sync logic; a single route table dispatches to the sync services.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{Cli, Commands, OutputFormat, ScanArgs};
pub use presentation::{
    format_error, format_hashes, format_plan, format_snapshot, format_sync_result,
};
pub use route::RunContext;
