//! JSON import/export of instances and solutions.
//!
//! One wire shape serves both payload kinds:
//!
//! ```json
//! {
//!   "Name": "demo", "MachineCount": 2, "JobCount": 2, "TimeUnit": "min",
//!   "MachineNames": ["M0", "M1"], "JobNames": ["J0", "J1"],
//!   "Data": [[[0, 3], [1, 2]], [[1, 2], [0, 4]]]
//! }
//! ```
//!
//! `Data` is jagged by job, then by operation. A pair `[machine,
//! duration]` is a bare instance operation; a triple `[machine, duration,
//! start]` carries a start time, and the presence of any third element
//! classifies the whole payload as a solution. Import collects every
//! shape error before giving up — the caller's model is untouched on
//! failure — and reports count mismatches as warnings, not errors.
//! Structural problems (machine range, negative durations) are the
//! solver's business, not the importer's.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Instance, Op, ScheduledOp, Solution};

/// A shape defect in an imported payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The text is not valid JSON for the wire shape.
    #[error("invalid JSON: {0}")]
    Json(String),

    /// An operation tuple has the wrong arity.
    #[error("job {job} op {op}: expected {expected} elements, found {found}")]
    BadTuple {
        job: usize,
        op: usize,
        expected: &'static str,
        found: usize,
    },

    /// A machine index is negative and cannot be an index at all.
    #[error("job {job} op {op}: machine index {value} is negative")]
    NegativeMachine { job: usize, op: usize, value: i64 },
}

/// What an import produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// A bare problem instance (all pairs).
    Instance(Instance),
    /// A schedule (at least one triple).
    Solution(Solution),
}

/// A successful import: the payload plus non-fatal observations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Import {
    /// The classified payload.
    pub payload: Payload,
    /// Count mismatches and similar oddities worth surfacing.
    pub warnings: Vec<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawPayload {
    name: String,
    machine_count: usize,
    job_count: usize,
    time_unit: String,
    machine_names: Vec<String>,
    job_names: Vec<String>,
    data: Vec<Vec<Vec<i64>>>,
}

/// Parses a JSON payload and classifies it as instance or solution.
///
/// Returns every detected shape error; on failure nothing was built.
pub fn import_json(text: &str) -> Result<Import, Vec<ImportError>> {
    let raw: RawPayload =
        serde_json::from_str(text).map_err(|e| vec![ImportError::Json(e.to_string())])?;

    let is_solution = raw
        .data
        .iter()
        .flatten()
        .any(|tuple| tuple.len() >= 3);
    let expected = if is_solution {
        "[machine, duration, start]"
    } else {
        "[machine, duration]"
    };
    let arity = if is_solution { 3 } else { 2 };

    let mut errors = Vec::new();
    for (j, job) in raw.data.iter().enumerate() {
        for (o, tuple) in job.iter().enumerate() {
            if tuple.len() != arity {
                errors.push(ImportError::BadTuple {
                    job: j,
                    op: o,
                    expected,
                    found: tuple.len(),
                });
            } else if tuple[0] < 0 {
                errors.push(ImportError::NegativeMachine {
                    job: j,
                    op: o,
                    value: tuple[0],
                });
            }
        }
    }
    if !errors.is_empty() {
        return Err(errors);
    }

    let mut warnings = Vec::new();
    if !raw.machine_names.is_empty() && raw.machine_names.len() != raw.machine_count {
        warnings.push(format!(
            "MachineCount is {} but {} machine names were given",
            raw.machine_count,
            raw.machine_names.len()
        ));
    }
    if raw.job_count != raw.data.len() {
        warnings.push(format!(
            "JobCount is {} but Data holds {} jobs",
            raw.job_count,
            raw.data.len()
        ));
    }
    if !raw.job_names.is_empty() && raw.job_names.len() != raw.data.len() {
        warnings.push(format!(
            "{} job names for {} jobs",
            raw.job_names.len(),
            raw.data.len()
        ));
    }

    let payload = if is_solution {
        let mut solution = Solution {
            name: raw.name,
            time_unit: raw.time_unit,
            machine_count: raw.machine_count,
            machine_names: raw.machine_names,
            job_names: raw.job_names,
            jobs: raw
                .data
                .iter()
                .map(|job| {
                    job.iter()
                        .map(|t| ScheduledOp::new(t[0] as usize, t[1], t[2]))
                        .collect()
                })
                .collect(),
            makespan: 0,
        };
        solution.makespan = solution.computed_makespan();
        Payload::Solution(solution)
    } else {
        Payload::Instance(Instance {
            name: raw.name,
            time_unit: raw.time_unit,
            machine_count: raw.machine_count,
            machine_names: raw.machine_names,
            job_names: raw.job_names,
            jobs: raw
                .data
                .iter()
                .map(|job| job.iter().map(|t| Op::new(t[0] as usize, t[1])).collect())
                .collect(),
        })
    };

    Ok(Import { payload, warnings })
}

/// Serializes an instance to the wire shape.
pub fn export_instance(instance: &Instance) -> serde_json::Result<String> {
    let raw = RawPayload {
        name: instance.name.clone(),
        machine_count: instance.machine_count,
        job_count: instance.job_count(),
        time_unit: instance.time_unit.clone(),
        machine_names: instance.machine_names.clone(),
        job_names: instance.job_names.clone(),
        data: instance
            .jobs
            .iter()
            .map(|job| {
                job.iter()
                    .map(|op| vec![op.machine as i64, op.duration])
                    .collect()
            })
            .collect(),
    };
    serde_json::to_string_pretty(&raw)
}

/// Serializes a solution to the wire shape (triples).
pub fn export_solution(solution: &Solution) -> serde_json::Result<String> {
    let raw = RawPayload {
        name: solution.name.clone(),
        machine_count: solution.machine_count,
        job_count: solution.job_count(),
        time_unit: solution.time_unit.clone(),
        machine_names: solution.machine_names.clone(),
        job_names: solution.job_names.clone(),
        data: solution
            .jobs
            .iter()
            .map(|job| {
                job.iter()
                    .map(|op| vec![op.machine as i64, op.duration, op.start])
                    .collect()
            })
            .collect(),
    };
    serde_json::to_string_pretty(&raw)
}
