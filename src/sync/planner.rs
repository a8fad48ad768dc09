//! Reconciliation planner
//!
//! Compares a source and a destination snapshot and produces the ordered list
//! of actions that makes the destination mirror the source:
//!
//! 1. content missing from the destination is copied from the source;
//! 2. content present under another name is renamed in place;
//! 3. destination content absent from the source is deleted.
//!
//! Copies and moves always precede deletes. A transfer writing a name runs
//! only after every move vacating that name, one of its parent directories,
//! or a file below it. Rename cycles are broken through a staging name at the
//! destination root. Stale files that collide with a target as a file/directory
//! conflict are moved to a staging name first and deleted from there. The
//! planner never fails and performs no I/O.

use crate::sync::action::Action;
use crate::tree::path::join_relative;
use crate::tree::snapshot::TreeSnapshot;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::ops::Bound;
use tracing::debug;

const STAGE_SUFFIX: &str = ".hashsync-stage";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransferKind {
    Copy,
    Move,
}

/// A copy or move expressed in snapshot-relative names
#[derive(Debug)]
struct Transfer {
    kind: TransferKind,
    /// Source-tree name for copies, destination-tree name for moves
    from: String,
    /// Destination-tree name
    to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Open,
    Done,
}

/// Plan the actions converging `dest` onto `source`
pub fn plan(source: &TreeSnapshot, dest: &TreeSnapshot) -> Vec<Action> {
    let transfers = diff_transfers(source, dest);
    let targets: BTreeSet<&str> = transfers.iter().map(|t| t.to.as_str()).collect();
    let mut taken: BTreeSet<String> = source
        .names()
        .chain(dest.names())
        .map(str::to_string)
        .collect();

    let mut actions = Vec::with_capacity(transfers.len());
    let mut aside: HashMap<&str, String> = HashMap::new();
    for (identity, name) in dest.iter() {
        if source.contains(identity) || !collides(name, &targets) {
            continue;
        }
        let stage = staging_name(name, &mut taken);
        debug!(name, stage = %stage, "Moving conflicting stale file aside");
        actions.push(Action::Move {
            from: join_relative(dest.root(), name),
            to: join_relative(dest.root(), &stage),
        });
        aside.insert(name, stage);
    }

    actions.extend(sequence_transfers(&transfers, source, dest, &mut taken));

    for (identity, name) in dest.iter() {
        if source.contains(identity) {
            continue;
        }
        let path = match aside.get(name) {
            Some(stage) => join_relative(dest.root(), stage),
            None if targets.contains(name) => {
                debug!(name, "Stale content is replaced in place, no delete needed");
                continue;
            }
            None => join_relative(dest.root(), name),
        };
        actions.push(Action::Delete { path });
    }

    debug!(
        transfers = transfers.len(),
        actions = actions.len(),
        "Planned reconciliation"
    );
    actions
}

fn diff_transfers(source: &TreeSnapshot, dest: &TreeSnapshot) -> Vec<Transfer> {
    let mut transfers = Vec::new();
    for (identity, name) in source.iter() {
        match dest.get(identity) {
            None => transfers.push(Transfer {
                kind: TransferKind::Copy,
                from: name.to_string(),
                to: name.to_string(),
            }),
            Some(existing) if existing != name => transfers.push(Transfer {
                kind: TransferKind::Move,
                from: existing.to_string(),
                to: name.to_string(),
            }),
            Some(_) => {}
        }
    }
    transfers
}

/// Order transfers so no write lands on a path still occupied by a file
/// another move will take away
///
/// Transfers are visited depth first along "waits for" edges. Meeting a move
/// that is already on the visit path means a cycle, broken by renaming that
/// move's file to a staging name and finishing the move from there.
fn sequence_transfers(
    transfers: &[Transfer],
    source: &TreeSnapshot,
    dest: &TreeSnapshot,
    taken: &mut BTreeSet<String>,
) -> Vec<Action> {
    let vacated_by: BTreeMap<&str, usize> = transfers
        .iter()
        .enumerate()
        .filter(|(_, t)| t.kind == TransferKind::Move)
        .map(|(index, t)| (t.from.as_str(), index))
        .collect();
    let blockers = |index: usize| -> Vec<usize> {
        let to = transfers[index].to.as_str();
        let prefix = format!("{}/", to);
        let below = vacated_by
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(&prefix))
            .map(|(_, &other)| other);
        let mut found: Vec<usize> = ancestors(to)
            .chain(std::iter::once(to))
            .filter_map(|name| vacated_by.get(name).copied())
            .chain(below)
            .collect();
        found.sort_unstable();
        found.dedup();
        // Popped from the back, so visit in ascending order
        found.reverse();
        found
    };

    let mut state = vec![Visit::New; transfers.len()];
    let mut staged: HashMap<usize, String> = HashMap::new();
    let mut actions = Vec::with_capacity(transfers.len());

    for start in 0..transfers.len() {
        if state[start] != Visit::New {
            continue;
        }
        state[start] = Visit::Open;
        let mut stack = vec![(start, blockers(start))];

        while let Some((index, pending)) = stack.last_mut() {
            let index = *index;
            if let Some(next) = pending.pop() {
                if state[next] == Visit::Done || staged.contains_key(&next) {
                    continue;
                }
                if state[next] == Visit::Open {
                    let from = transfers[next].from.as_str();
                    let stage = staging_name(from, taken);
                    debug!(from, stage = %stage, "Breaking rename cycle");
                    actions.push(Action::Move {
                        from: join_relative(dest.root(), from),
                        to: join_relative(dest.root(), &stage),
                    });
                    staged.insert(next, stage);
                    continue;
                }
                state[next] = Visit::Open;
                stack.push((next, blockers(next)));
                continue;
            }

            stack.pop();
            let transfer = &transfers[index];
            actions.push(match transfer.kind {
                TransferKind::Copy => Action::Copy {
                    from: join_relative(source.root(), &transfer.from),
                    to: join_relative(dest.root(), &transfer.to),
                },
                TransferKind::Move => {
                    let from = staged.get(&index).unwrap_or(&transfer.from);
                    Action::Move {
                        from: join_relative(dest.root(), from),
                        to: join_relative(dest.root(), &transfer.to),
                    }
                }
            });
            state[index] = Visit::Done;
        }
    }

    actions
}

/// True when `name` is a strict parent directory of a target or lies below one
fn collides(name: &str, targets: &BTreeSet<&str>) -> bool {
    let prefix = format!("{}/", name);
    ancestors(name).any(|parent| targets.contains(parent))
        || targets
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|target| target.starts_with(&prefix))
}

/// Strict ancestors of a `/`-separated name, shortest first
fn ancestors(name: &str) -> impl Iterator<Item = &str> {
    name.match_indices('/').map(move |(at, _)| &name[..at])
}

/// A free name at the destination root for parking `name`'s file
///
/// Free means no scanned file has that name and none lies below it.
fn staging_name(name: &str, taken: &mut BTreeSet<String>) -> String {
    let base = name.rsplit('/').next().unwrap_or(name);
    let mut candidate = format!("{}{}", base, STAGE_SUFFIX);
    let mut attempt = 1;
    while !is_free(&candidate, taken) {
        candidate = format!("{}{}-{}", base, STAGE_SUFFIX, attempt);
        attempt += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

fn is_free(candidate: &str, taken: &BTreeSet<String>) -> bool {
    let prefix = format!("{}/", candidate);
    !taken.contains(candidate)
        && !taken
            .range::<str, _>((Bound::Included(prefix.as_str()), Bound::Unbounded))
            .next()
            .is_some_and(|name| name.starts_with(&prefix))
}
