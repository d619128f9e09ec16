//! Conflict detection and repair for the live board.
//!
//! The scanner runs after every edit and reports, it never blocks:
//! precedence-link violations (both endpoints flagged) and overlapping
//! task pairs per machine. [`auto_fix`] repairs what a forward nudge can
//! repair — tasks are visited in topological order and pushed right by
//! the minimum amount satisfying their violated constraints — then the
//! board is re-scanned and anything left is returned.

use std::collections::HashSet;

use tracing::{debug, warn};

use crate::graph::topological_order;
use crate::models::Board;

/// Classification of a detected conflict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// A precedence link's relation is not satisfied.
    PrecedenceViolation,
    /// Two tasks on one machine occupy overlapping intervals.
    MachineOverlap,
}

/// An advisory conflict annotation. Never blocks an edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// What kind of conflict.
    pub kind: ConflictKind,
    /// Both involved tasks — endpoints of the link, or the overlapping pair.
    pub tasks: [String; 2],
    /// Human-readable description.
    pub detail: String,
}

/// Scans the board for precedence violations and machine overlaps.
pub fn scan_conflicts(board: &Board) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for link in &board.links {
        let (Some(source), Some(target)) = (board.task(&link.source), board.task(&link.target))
        else {
            continue;
        };
        if !link.is_satisfied(source, target) {
            conflicts.push(Conflict {
                kind: ConflictKind::PrecedenceViolation,
                tasks: [link.source.clone(), link.target.clone()],
                detail: format!(
                    "{:?} link {} -> {} requires start >= {}, found {}",
                    link.kind,
                    link.source,
                    link.target,
                    link.required_target_start(source, target.duration),
                    target.start
                ),
            });
        }
    }

    let machine_ids: HashSet<&str> = board
        .tasks
        .iter()
        .filter_map(|t| t.machine.as_deref())
        .collect();
    for machine_id in machine_ids {
        let timeline = board.machine_timeline(machine_id);
        for (i, a) in timeline.iter().enumerate() {
            for b in &timeline[i + 1..] {
                if a.overlaps(b) {
                    conflicts.push(Conflict {
                        kind: ConflictKind::MachineOverlap,
                        tasks: [a.id.clone(), b.id.clone()],
                        detail: format!(
                            "machine {}: {} [{}, {}) overlaps {} [{}, {})",
                            machine_id,
                            a.id,
                            a.start,
                            a.end(),
                            b.id,
                            b.start,
                            b.end()
                        ),
                    });
                }
            }
        }
    }

    conflicts
}

/// Task IDs flagged by a set of conflicts (both endpoints of each).
pub fn flagged_tasks(conflicts: &[Conflict]) -> HashSet<String> {
    conflicts
        .iter()
        .flat_map(|c| c.tasks.iter().cloned())
        .collect()
}

/// Repairs conflicts by nudging tasks forward, then re-scans.
///
/// Visit order is topological over the link graph; on a cycle the board's
/// insertion order is used instead (logged, never an error). Each visited
/// task moves right by the minimum satisfying its incoming links and any
/// overlap with already-settled machine-mates. Returns the conflicts that
/// remain after the pass.
pub fn auto_fix(board: &mut Board) -> Vec<Conflict> {
    let ids: Vec<&str> = board.tasks.iter().map(|t| t.id.as_str()).collect();
    let edges = board
        .links
        .iter()
        .map(|l| (l.source.clone(), l.target.clone()));

    let order = match topological_order(&ids, edges) {
        Ok(order) => order,
        Err(err) => {
            warn!(
                stuck = ?err.stuck,
                "precedence graph is cyclic; repairing in insertion order"
            );
            ids.iter().map(|s| s.to_string()).collect()
        }
    };

    let mut settled: HashSet<String> = HashSet::new();
    for id in order {
        let Some(task) = board.task(&id).cloned() else {
            continue;
        };

        let mut bound = task.start;
        for link in board.incoming_links(&id) {
            if let Some(source) = board.task(&link.source) {
                bound = bound.max(link.required_target_start(source, task.duration));
            }
        }
        if let Some(machine_id) = &task.machine {
            for mate in board.machine_timeline(machine_id) {
                if mate.id == id || !mate.overlaps(&task) {
                    continue;
                }
                // Yield to earlier starters and to mates already settled
                if mate.start < task.start || settled.contains(&mate.id) {
                    bound = bound.max(mate.end());
                }
            }
        }

        if bound > task.start {
            debug!(task = %id, from = task.start, to = bound, "auto-fix nudged task");
            if let Some(t) = board.task_mut(&id) {
                t.start = bound;
            }
        }
        settled.insert(id);
    }

    scan_conflicts(board)
}
