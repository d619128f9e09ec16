//! Single-task compression.
//!
//! Repositions one task at a time against the live board: earliest slides
//! it to the first machine gap past its predecessors, latest to the
//! right-most gap under the deadline (or makespan) and ahead of its
//! successors. Both operate on possibly-infeasible state and change
//! nothing when no gap fits — an infeasible request is a no-op, not an
//! error.

use tracing::debug;

use crate::models::{Board, Task};

/// A free span on a machine timeline. `end == None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Gap {
    start: i64,
    end: Option<i64>,
}

/// Free spans on a task's machine, in time order, the task itself
/// excluded. Overlapping occupants (the live model allows them) are
/// merged by tracking the furthest end seen.
fn gaps(board: &Board, machine_id: &str, exclude: &str) -> Vec<Gap> {
    let mut occupants: Vec<&Task> = board
        .machine_timeline(machine_id)
        .into_iter()
        .filter(|t| t.id != exclude)
        .collect();
    occupants.sort_by_key(|t| t.start);

    let mut result = Vec::new();
    let mut cursor = 0i64;
    for occ in occupants {
        if occ.start > cursor {
            result.push(Gap {
                start: cursor,
                end: Some(occ.start),
            });
        }
        cursor = cursor.max(occ.end());
    }
    result.push(Gap {
        start: cursor,
        end: None,
    });
    result
}

/// Earliest start allowed by the task's incoming links, clamped to t=0.
fn predecessor_bound(board: &Board, task: &Task) -> i64 {
    board
        .incoming_links(&task.id)
        .iter()
        .filter_map(|link| {
            board
                .task(&link.source)
                .map(|source| link.required_target_start(source, task.duration))
        })
        .max()
        .unwrap_or(0)
        .max(0)
}

/// Moves a task to its earliest feasible position.
///
/// Scans the machine timeline from t=0 for the first gap that holds the
/// duration at or after the predecessor bound. Returns `false` when the
/// task is missing, unassigned, or (never with an unbounded final gap)
/// nothing fits; the board is unchanged in that case.
pub fn compress_earliest(board: &mut Board, task_id: &str) -> bool {
    let Some(task) = board.task(task_id).cloned() else {
        return false;
    };
    let Some(machine_id) = task.machine.clone() else {
        return false;
    };

    let bound = predecessor_bound(board, &task);
    for gap in gaps(board, &machine_id, task_id) {
        let candidate = gap.start.max(bound);
        let fits = match gap.end {
            Some(end) => candidate + task.duration <= end,
            None => true,
        };
        if fits {
            debug!(task = task_id, start = candidate, "compressed earliest");
            if let Some(t) = board.task_mut(task_id) {
                t.start = candidate;
            }
            return true;
        }
    }
    false
}

/// Moves a task to its latest feasible position.
///
/// The upper bound on the task's end is the deadline marker if set, else
/// the current makespan, tightened to the earliest start among successor
/// tasks. Gaps are tried right to left (after the last occupant, then
/// between occupants, then before the first) and the right-most fitting
/// start wins. Returns `false` and leaves the task unchanged when no gap
/// fits.
pub fn compress_latest(board: &mut Board, task_id: &str) -> bool {
    let Some(task) = board.task(task_id).cloned() else {
        return false;
    };
    let Some(machine_id) = task.machine.clone() else {
        return false;
    };

    let mut upper = board.deadline.unwrap_or_else(|| board.makespan());
    for link in board.outgoing_links(task_id) {
        if let Some(successor) = board.task(&link.target) {
            upper = upper.min(successor.start);
        }
    }
    let lower = predecessor_bound(board, &task);

    for gap in gaps(board, &machine_id, task_id).into_iter().rev() {
        let latest_end = match gap.end {
            Some(end) => end.min(upper),
            None => upper,
        };
        let candidate = latest_end - task.duration;
        if candidate >= gap.start && candidate >= lower {
            debug!(task = task_id, start = candidate, "compressed latest");
            if let Some(t) = board.task_mut(task_id) {
                t.start = candidate;
            }
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LinkKind, PrecedenceLink};

    fn board_with(tasks: Vec<Task>) -> Board {
        let mut board = Board::new();
        board.add_machine(crate::models::Machine::new("M1"));
        for task in tasks {
            board.add_task(task);
        }
        board
    }

    fn task(id: &str, start: i64, duration: i64) -> Task {
        Task::new(id)
            .with_machine("M1")
            .with_start(start)
            .with_duration(duration)
    }

    #[test]
    fn test_earliest_moves_to_first_gap() {
        let mut board = board_with(vec![
            task("A", 0, 3),
            task("B", 5, 4),
            task("X", 12, 2),
        ]);
        assert!(compress_earliest(&mut board, "X"));
        // First gap is [3,5), wide enough for 2
        assert_eq!(board.task("X").unwrap().start, 3);
    }

    #[test]
    fn test_earliest_respects_predecessor_bound() {
        let mut board = board_with(vec![
            task("A", 0, 3),
            task("B", 5, 4),
            task("P", 0, 4),
            task("X", 12, 1),
        ]);
        board.task_mut("P").unwrap().machine = Some("M2".into());
        board.add_link(PrecedenceLink::new("P", "X"));
        assert!(compress_earliest(&mut board, "X"));
        // Gap [3,5) clipped by P's end (4): candidate 4, 4+1 <= 5 fits
        assert_eq!(board.task("X").unwrap().start, 4);
    }

    #[test]
    fn test_earliest_uses_span_before_first_occupant() {
        let mut board = board_with(vec![task("A", 4, 3), task("X", 10, 2)]);
        assert!(compress_earliest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 0);
    }

    #[test]
    fn test_earliest_idempotent() {
        let mut board = board_with(vec![
            task("A", 0, 3),
            task("B", 5, 4),
            task("X", 12, 2),
        ]);
        compress_earliest(&mut board, "X");
        let first = board.task("X").unwrap().start;
        compress_earliest(&mut board, "X");
        assert_eq!(board.task("X").unwrap().start, first);
    }

    #[test]
    fn test_earliest_skips_relation_kinds() {
        // SS link: X may start with P, not after it
        let mut board = board_with(vec![task("P", 2, 5), task("X", 9, 2)]);
        board.task_mut("P").unwrap().machine = Some("M2".into());
        board
            .add_link(PrecedenceLink::new("P", "X").with_kind(LinkKind::StartToStart));
        assert!(compress_earliest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 2);
    }

    #[test]
    fn test_earliest_unassigned_is_noop() {
        let mut board = board_with(vec![task("X", 5, 2)]);
        board.task_mut("X").unwrap().machine = None;
        assert!(!compress_earliest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 5);
    }

    #[test]
    fn test_earliest_missing_task_is_noop() {
        let mut board = board_with(vec![]);
        assert!(!compress_earliest(&mut board, "ghost"));
    }

    #[test]
    fn test_latest_under_deadline() {
        let mut board = board_with(vec![task("A", 0, 3), task("X", 0, 2)]);
        board.task_mut("X").unwrap().start = 4;
        board.set_deadline(10);
        assert!(compress_latest(&mut board, "X"));
        // Unbounded gap after A: end clipped to 10, start 8
        assert_eq!(board.task("X").unwrap().start, 8);
    }

    #[test]
    fn test_latest_defaults_to_makespan() {
        let mut board = board_with(vec![task("A", 0, 3), task("B", 6, 4), task("X", 3, 2)]);
        assert!(compress_latest(&mut board, "X"));
        // Makespan 10; gap after B fails (10-2=8 < 10), gap [3,6) holds 4
        assert_eq!(board.task("X").unwrap().start, 4);
    }

    #[test]
    fn test_latest_tightened_by_successor() {
        let mut board = board_with(vec![task("A", 0, 3), task("X", 3, 2), task("S", 6, 3)]);
        board.task_mut("S").unwrap().machine = Some("M2".into());
        board.add_link(PrecedenceLink::new("X", "S"));
        board.set_deadline(20);
        assert!(compress_latest(&mut board, "X"));
        // Upper bound = successor start 6, so X ends at 6
        assert_eq!(board.task("X").unwrap().start, 4);
    }

    #[test]
    fn test_latest_no_fit_is_noop() {
        let mut board = board_with(vec![task("A", 0, 8), task("X", 9, 3)]);
        board.set_deadline(5);
        // Only gap under the bound is [0,0); nothing holds 3 units by t=5
        assert!(!compress_latest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 9);
    }

    #[test]
    fn test_latest_respects_lower_bound() {
        let mut board = board_with(vec![task("P", 0, 4), task("X", 0, 2)]);
        board.task_mut("P").unwrap().machine = Some("M2".into());
        board.add_link(PrecedenceLink::new("P", "X"));
        board.set_deadline(3);
        // Lower bound 4 > upper-bound start 1: nothing fits
        assert!(!compress_latest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 0);
    }

    #[test]
    fn test_gap_merging_with_overlapping_occupants() {
        // A and B overlap; the free span starts at the furthest end
        let mut board = board_with(vec![task("A", 0, 6), task("B", 2, 2), task("X", 20, 3)]);
        assert!(compress_earliest(&mut board, "X"));
        assert_eq!(board.task("X").unwrap().start, 6);
    }
}
