//! Schedule solution model.
//!
//! A solution is an instance plus a start time for every operation. It
//! carries the makespan it was built with; the validator recomputes the
//! value and flags any disagreement.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3

use serde::{Deserialize, Serialize};

use super::Instance;

/// One scheduled operation: machine, duration, and assigned start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledOp {
    /// Machine index (0-based).
    pub machine: usize,
    /// Processing duration (time units).
    pub duration: i64,
    /// Assigned start offset (time units).
    pub start: i64,
}

impl ScheduledOp {
    /// Creates a new scheduled operation.
    pub fn new(machine: usize, duration: i64, start: i64) -> Self {
        Self {
            machine,
            duration,
            start,
        }
    }

    /// End offset (`start + duration`).
    #[inline]
    pub fn end(&self) -> i64 {
        self.start + self.duration
    }
}

/// A complete schedule for a job-shop instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    /// Solution name (usually the instance name).
    pub name: String,
    /// Display label for one time unit.
    pub time_unit: String,
    /// Number of machines.
    pub machine_count: usize,
    /// Machine display names (may be empty).
    pub machine_names: Vec<String>,
    /// Job display names (may be empty).
    pub job_names: Vec<String>,
    /// Per-job ordered operation lists with start times.
    pub jobs: Vec<Vec<ScheduledOp>>,
    /// Makespan stored at construction time.
    pub makespan: i64,
}

impl Solution {
    /// Creates an empty solution carrying an instance's metadata.
    pub fn for_instance(instance: &Instance) -> Self {
        Self {
            name: instance.name.clone(),
            time_unit: instance.time_unit.clone(),
            machine_count: instance.machine_count,
            machine_names: instance.machine_names.clone(),
            job_names: instance.job_names.clone(),
            jobs: vec![Vec::new(); instance.job_count()],
            makespan: 0,
        }
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Recomputed makespan: latest end across all operations, 0 when empty.
    pub fn computed_makespan(&self) -> i64 {
        self.jobs
            .iter()
            .flatten()
            .map(ScheduledOp::end)
            .max()
            .unwrap_or(0)
    }

    /// All operations on a machine as `(job, op_index, op)`, sorted by start.
    pub fn machine_timeline(&self, machine: usize) -> Vec<(usize, usize, ScheduledOp)> {
        let mut ops: Vec<(usize, usize, ScheduledOp)> = self
            .jobs
            .iter()
            .enumerate()
            .flat_map(|(j, ops)| {
                ops.iter()
                    .enumerate()
                    .filter(move |(_, op)| op.machine == machine)
                    .map(move |(o, op)| (j, o, *op))
            })
            .collect();
        ops.sort_by_key(|(_, _, op)| op.start);
        ops
    }

    /// Total busy time on a machine.
    pub fn machine_busy_time(&self, machine: usize) -> i64 {
        self.jobs
            .iter()
            .flatten()
            .filter(|op| op.machine == machine)
            .map(|op| op.duration)
            .sum()
    }
}
