//! CLI presentation: text tables and JSON renderings of command results.

use crate::cli::parse::OutputFormat;
use crate::error::SyncError;
use crate::sync::{Action, ActionCounts, SyncPlan, SyncResult};
use crate::tree::snapshot::TreeSnapshot;
use crate::types::ContentIdentity;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use owo_colors::OwoColorize;
use std::path::PathBuf;

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, SyncError> {
    serde_json::to_string_pretty(value)
        .map_err(|e| SyncError::ConfigError(format!("Failed to render JSON: {}", e)))
}

fn action_table(actions: &[Action]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Action", "From", "To"]);
    for (index, action) in actions.iter().enumerate() {
        let from = action
            .origin()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            index.to_string(),
            action.kind().to_string(),
            from,
            action.target().display().to_string(),
        ]);
    }
    table
}

fn counts_line(counts: &ActionCounts) -> String {
    format!(
        "{} copied, {} moved, {} deleted",
        counts.copied.green(),
        counts.moved.yellow(),
        counts.deleted.red()
    )
}

/// Render a sync result
pub fn format_sync_result(result: &SyncResult, format: OutputFormat) -> Result<String, SyncError> {
    if format == OutputFormat::Json {
        return to_json(result);
    }

    let mut out = String::new();
    let title = if result.dry_run { "Sync (dry run)" } else { "Sync" };
    out.push_str(&format!(
        "{} {} -> {}\n",
        title.bold(),
        result.source.display(),
        result.dest.display()
    ));
    if result.was_converged() {
        out.push_str(&format!("{}", "Already in sync".green()));
        return Ok(out);
    }
    out.push_str(&action_table(&result.actions).to_string());
    out.push('\n');
    out.push_str(&counts_line(&result.counts));
    out.push_str(&format!(" in {} ms", result.elapsed_ms));
    Ok(out)
}

/// Render a plan without executing it
pub fn format_plan(plan: &SyncPlan, format: OutputFormat) -> Result<String, SyncError> {
    if format == OutputFormat::Json {
        return to_json(&serde_json::json!({
            "source": plan.source.root(),
            "dest": plan.dest.root(),
            "actions": plan.actions,
            "counts": ActionCounts::tally(&plan.actions),
        }));
    }

    if plan.actions.is_empty() {
        return Ok(format!("{}", "Already in sync".green()));
    }
    let mut out = action_table(&plan.actions).to_string();
    out.push('\n');
    out.push_str(&counts_line(&ActionCounts::tally(&plan.actions)));
    Ok(out)
}

/// Render a snapshot
pub fn format_snapshot(snapshot: &TreeSnapshot, format: OutputFormat) -> Result<String, SyncError> {
    if format == OutputFormat::Json {
        return to_json(snapshot);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Identity", "Name"]);
    for (identity, name) in snapshot.iter() {
        table.add_row(vec![identity.as_str(), name]);
    }
    let mut out = format!("{}\n", snapshot.root().display().bold());
    out.push_str(&table.to_string());
    out.push_str(&format!(
        "\n{} identities, {} duplicate files collapsed",
        snapshot.len(),
        snapshot.shadowed()
    ));
    Ok(out)
}

/// Render file identities, one per line like `sha1sum`
pub fn format_hashes(
    hashes: &[(PathBuf, ContentIdentity)],
    format: OutputFormat,
) -> Result<String, SyncError> {
    if format == OutputFormat::Json {
        let rows: Vec<serde_json::Value> = hashes
            .iter()
            .map(|(path, identity)| {
                serde_json::json!({
                    "path": path,
                    "identity": identity,
                })
            })
            .collect();
        return to_json(&rows);
    }

    Ok(hashes
        .iter()
        .map(|(path, identity)| format!("{}  {}", identity, path.display()))
        .collect::<Vec<_>>()
        .join("\n"))
}

/// Render an error for stderr
pub fn format_error(err: &SyncError) -> String {
    let mut out = format!("{} {}", "error:".red().bold(), err);
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        out.push_str(&format!("\n  caused by: {}", cause));
        source = cause.source();
    }
    if let SyncError::ActionFailed { index, .. } = err {
        out.push_str(&format!(
            "\n{} actions before #{} were applied; re-running sync is safe",
            "note:".yellow(),
            index
        ));
    }
    out
}
