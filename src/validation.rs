//! Feasibility validation for job-shop schedules.
//!
//! Checks a candidate [`Solution`] against its [`Instance`]:
//! - every operation of every job is present exactly once, with the
//!   machine and duration the instance declares
//! - machine intervals are pairwise disjoint
//! - operations within a job run in routing order
//! - the stored makespan matches the recomputed one
//!
//! All violations are collected and deduplicated; the report also carries
//! quality metrics (utilization, lower bound, optimality gap).
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 7;
//! Taillard (1993), "Benchmarks for basic scheduling problems" (the
//! two-sided lower bound)

use crate::models::{Instance, Solution};

/// Quality metrics for a feasible (or near-feasible) schedule.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleMetrics {
    /// Average machine utilization in percent:
    /// `Σ busy / (machines × makespan) × 100`.
    pub avg_utilization_pct: f64,
    /// Per-machine utilization in percent, indexed by machine.
    pub utilization_by_machine: Vec<f64>,
    /// Lower bound on the makespan: max of the heaviest machine load and
    /// the longest job duration.
    pub lower_bound: i64,
    /// Gap between makespan and lower bound in percent.
    pub gap_pct: f64,
}

/// Outcome of validating a solution against its instance.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// Whether no violations were found.
    pub is_valid: bool,
    /// Recomputed makespan (not the stored one).
    pub makespan: i64,
    /// Deduplicated violation descriptions.
    pub violations: Vec<String>,
    /// Quality metrics, computed against the recomputed makespan.
    pub metrics: ScheduleMetrics,
}

/// Validates a candidate schedule and computes its quality metrics.
pub fn validate(instance: &Instance, solution: &Solution) -> ValidationReport {
    let mut violations = Vec::new();
    // Identical findings (e.g. one defect tripping two checks) collapse
    fn push(violations: &mut Vec<String>, v: String) {
        if !violations.contains(&v) {
            violations.push(v);
        }
    }

    // Operation presence: one scheduled op per instance op, same machine
    // and duration, in the same routing slot.
    if solution.job_count() != instance.job_count() {
        push(
            &mut violations,
            format!(
                "solution has {} jobs, instance has {}",
                solution.job_count(),
                instance.job_count()
            ),
        );
    }
    for (j, ops) in instance.jobs.iter().enumerate() {
        let Some(scheduled) = solution.jobs.get(j) else {
            continue;
        };
        if scheduled.len() != ops.len() {
            push(
                &mut violations,
                format!(
                    "job {} schedules {} of {} operations",
                    j,
                    scheduled.len(),
                    ops.len()
                ),
            );
        }
        for (o, (op, sop)) in ops.iter().zip(scheduled.iter()).enumerate() {
            if sop.machine != op.machine || sop.duration != op.duration {
                push(
                    &mut violations,
                    format!(
                        "job {j} op {o} scheduled as (machine {}, duration {}), instance declares (machine {}, duration {})",
                        sop.machine, sop.duration, op.machine, op.duration
                    ),
                );
            }
        }
    }

    // Machine exclusivity: sorted by start, any overlap shows up between
    // neighbours.
    for machine in 0..solution.machine_count {
        let timeline = solution.machine_timeline(machine);
        for pair in timeline.windows(2) {
            let (ja, oa, a) = pair[0];
            let (jb, ob, b) = pair[1];
            if b.start < a.end() {
                push(
                    &mut violations,
                    format!(
                        "machine {machine}: job {ja} op {oa} [{}, {}) overlaps job {jb} op {ob} [{}, {})",
                        a.start,
                        a.end(),
                        b.start,
                        b.end()
                    ),
                );
            }
        }
    }

    // Job routing order.
    for (j, scheduled) in solution.jobs.iter().enumerate() {
        for (o, pair) in scheduled.windows(2).enumerate() {
            if pair[1].start < pair[0].end() {
                push(
                    &mut violations,
                    format!(
                        "job {j}: op {} starts at {} before op {o} ends at {}",
                        o + 1,
                        pair[1].start,
                        pair[0].end()
                    ),
                );
            }
        }
    }

    // Stored makespan agreement.
    let makespan = solution.computed_makespan();
    if solution.makespan != makespan {
        push(
            &mut violations,
            format!(
                "stored makespan {} differs from recomputed {}",
                solution.makespan, makespan
            ),
        );
    }

    let metrics = compute_metrics(instance, solution, makespan);

    ValidationReport {
        is_valid: violations.is_empty(),
        makespan,
        violations,
        metrics,
    }
}

fn compute_metrics(instance: &Instance, solution: &Solution, makespan: i64) -> ScheduleMetrics {
    let machine_count = solution.machine_count;

    let utilization_by_machine: Vec<f64> = (0..machine_count)
        .map(|m| {
            if makespan > 0 {
                solution.machine_busy_time(m) as f64 / makespan as f64 * 100.0
            } else {
                0.0
            }
        })
        .collect();

    let busy_total: i64 = (0..machine_count)
        .map(|m| solution.machine_busy_time(m))
        .sum();
    let avg_utilization_pct = if makespan > 0 && machine_count > 0 {
        busy_total as f64 / (machine_count as i64 * makespan) as f64 * 100.0
    } else {
        0.0
    };

    let machine_bound = (0..instance.machine_count)
        .map(|m| instance.machine_load(m))
        .max()
        .unwrap_or(0);
    let job_bound = (0..instance.job_count())
        .map(|j| instance.job_duration(j))
        .max()
        .unwrap_or(0);
    let lower_bound = machine_bound.max(job_bound);

    let gap_pct = if lower_bound > 0 {
        (makespan - lower_bound) as f64 / lower_bound as f64 * 100.0
    } else {
        0.0
    };

    ScheduleMetrics {
        avg_utilization_pct,
        utilization_by_machine,
        lower_bound,
        gap_pct,
    }
}
