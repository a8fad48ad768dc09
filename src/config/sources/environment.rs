//! Environment source: HASHSYNC_<SECTION>__<KEY> variables
//!
//! e.g. `HASHSYNC_SCAN__ALGORITHM=blake3`, `HASHSYNC_EXECUTE__DRY_RUN=true`,
//! `HASHSYNC_SCAN__IGNORE_PATTERNS=.git,target`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

pub const ENV_PREFIX: &str = "HASHSYNC";

/// Add environment overrides to builder. Applied after file sources.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scan.ignore_patterns"),
    )
}
