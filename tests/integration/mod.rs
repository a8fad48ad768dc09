//! Integration tests for hashsync

mod fail_fast;
mod sync_scenarios;
