//! Job-shop problem instance.
//!
//! An instance describes the problem only: per-job ordered operation lists
//! of (machine, duration) pairs. No start times — those belong to
//! [`Solution`](super::Solution).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7 (Jm || C_max)

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One operation in a job's routing: a machine index and a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Op {
    /// Machine index (0-based, `< machine_count`).
    pub machine: usize,
    /// Processing duration (time units, non-negative).
    pub duration: i64,
}

impl Op {
    /// Creates a new operation.
    pub fn new(machine: usize, duration: i64) -> Self {
        Self { machine, duration }
    }
}

/// Structural defect in an instance.
///
/// Collected exhaustively by [`Instance::check_structure`]; the solver
/// refuses to run on a defective instance.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InstanceError {
    /// A job has no operations.
    #[error("job {job} has no operations")]
    EmptyJob { job: usize },

    /// An operation references a machine index outside `0..machine_count`.
    #[error("job {job} op {op} references machine {machine}, but only {machine_count} machines exist")]
    MachineIndexOutOfRange {
        job: usize,
        op: usize,
        machine: usize,
        machine_count: usize,
    },

    /// An operation has a negative duration.
    #[error("job {job} op {op} has negative duration {duration}")]
    NegativeDuration { job: usize, op: usize, duration: i64 },
}

/// A job-shop scheduling instance.
///
/// Jagged by job, then by operation. Machine and job names are optional
/// display metadata; positions are authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instance {
    /// Instance name.
    pub name: String,
    /// Display label for one time unit (e.g. "min").
    pub time_unit: String,
    /// Number of machines.
    pub machine_count: usize,
    /// Machine display names (may be empty).
    pub machine_names: Vec<String>,
    /// Job display names (may be empty).
    pub job_names: Vec<String>,
    /// Per-job ordered operation lists.
    pub jobs: Vec<Vec<Op>>,
}

impl Instance {
    /// Creates an empty instance with the given machine count.
    pub fn new(name: impl Into<String>, machine_count: usize) -> Self {
        Self {
            name: name.into(),
            machine_count,
            ..Self::default()
        }
    }

    /// Sets the time unit label.
    pub fn with_time_unit(mut self, unit: impl Into<String>) -> Self {
        self.time_unit = unit.into();
        self
    }

    /// Appends a job given as (machine, duration) pairs.
    pub fn with_job(mut self, ops: Vec<(usize, i64)>) -> Self {
        self.jobs
            .push(ops.into_iter().map(|(m, d)| Op::new(m, d)).collect());
        self
    }

    /// Number of jobs.
    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Total number of operations across all jobs.
    pub fn operation_count(&self) -> usize {
        self.jobs.iter().map(Vec::len).sum()
    }

    /// Total processing time of a job's routing.
    pub fn job_duration(&self, job: usize) -> i64 {
        self.jobs
            .get(job)
            .map(|ops| ops.iter().map(|op| op.duration).sum())
            .unwrap_or(0)
    }

    /// Total load placed on a machine by all jobs.
    pub fn machine_load(&self, machine: usize) -> i64 {
        self.jobs
            .iter()
            .flatten()
            .filter(|op| op.machine == machine)
            .map(|op| op.duration)
            .sum()
    }

    /// Checks structural constraints.
    ///
    /// Detects empty jobs, out-of-range machine indices, and negative
    /// durations. Returns all defects, not just the first.
    pub fn check_structure(&self) -> Result<(), Vec<InstanceError>> {
        let mut errors = Vec::new();

        for (j, ops) in self.jobs.iter().enumerate() {
            if ops.is_empty() {
                errors.push(InstanceError::EmptyJob { job: j });
            }
            for (o, op) in ops.iter().enumerate() {
                if op.machine >= self.machine_count {
                    errors.push(InstanceError::MachineIndexOutOfRange {
                        job: j,
                        op: o,
                        machine: op.machine,
                        machine_count: self.machine_count,
                    });
                }
                if op.duration < 0 {
                    errors.push(InstanceError::NegativeDuration {
                        job: j,
                        op: o,
                        duration: op.duration,
                    });
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
