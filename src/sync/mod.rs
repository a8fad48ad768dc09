//! Reconciliation and execution
//!
//! Turns two snapshots into an ordered action list and applies it.

pub mod action;
pub mod executor;
pub mod orchestrator;
pub mod planner;

pub use action::{Action, ActionCounts, ActionKind};
pub use executor::{Executor, ExecutorOptions};
pub use orchestrator::{sync, SyncOptions, SyncPlan, SyncResult, Synchronizer};
pub use planner::plan;
