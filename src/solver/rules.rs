//! Dispatch rules.
//!
//! A closed set of priority heuristics for the event-driven simulation in
//! [`sim`](super::sim). Each rule is a ranking key over the jobs whose
//! next operation is currently eligible; no trait objects, the solver
//! matches on the variant.
//!
//! # Score Convention
//! Lower keys are scheduled first, following the academic convention
//! (SPT = shortest processing time first). Ties are broken by lowest job
//! index in the simulation loop.
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use serde::{Deserialize, Serialize};

/// A greedy dispatch heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DispatchRule {
    /// Shortest Processing Time: shortest next operation first.
    Spt,
    /// Longest Processing Time: longest next operation first.
    Lpt,
    /// First Come First Served: earliest job ready time first.
    Fcfs,
    /// Most Work Remaining: largest total remaining work first.
    Mwr,
    /// Least Work Remaining: smallest total remaining work first.
    Lwr,
}

impl DispatchRule {
    /// All rules, in the fixed priority order used by
    /// [`solve_multiple`](super::solve_multiple) to break makespan ties.
    pub const ALL: [DispatchRule; 5] = [
        DispatchRule::Spt,
        DispatchRule::Lpt,
        DispatchRule::Fcfs,
        DispatchRule::Mwr,
        DispatchRule::Lwr,
    ];

    /// Rule name (e.g. "SPT").
    pub fn name(&self) -> &'static str {
        match self {
            DispatchRule::Spt => "SPT",
            DispatchRule::Lpt => "LPT",
            DispatchRule::Fcfs => "FCFS",
            DispatchRule::Mwr => "MWR",
            DispatchRule::Lwr => "LWR",
        }
    }

    /// Rule description.
    pub fn description(&self) -> &'static str {
        match self {
            DispatchRule::Spt => "Shortest Processing Time",
            DispatchRule::Lpt => "Longest Processing Time",
            DispatchRule::Fcfs => "First Come First Served",
            DispatchRule::Mwr => "Most Work Remaining",
            DispatchRule::Lwr => "Least Work Remaining",
        }
    }

    /// Ranking key for an eligible job. Lower = scheduled first.
    ///
    /// * `next_duration` — duration of the job's next operation
    /// * `ready_at` — completion time of the job's last scheduled operation
    /// * `remaining_work` — total duration of the job's unscheduled operations
    pub fn key(&self, next_duration: i64, ready_at: i64, remaining_work: i64) -> i64 {
        match self {
            DispatchRule::Spt => next_duration,
            DispatchRule::Lpt => -next_duration,
            DispatchRule::Fcfs => ready_at,
            DispatchRule::Mwr => -remaining_work,
            DispatchRule::Lwr => remaining_work,
        }
    }
}

impl std::fmt::Display for DispatchRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
