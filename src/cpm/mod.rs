//! Critical-path method over calendar dates.
//!
//! A forward/backward pass over a typed, lagged dependency DAG. Works in
//! whole days with *inclusive* finish dates: a 1-day task starts and
//! finishes on the same date, so `EF = ES + duration − 1` and a
//! finish-to-start successor begins the following day.
//!
//! Cycles never fail the pass: a warning is logged and the input order
//! stands in for the topological one, so an interactive host keeps
//! rendering while the user untangles the graph.
//!
//! # Reference
//! Kelley & Walker (1959), "Critical-Path Planning and Scheduling";
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4.2

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use tracing::warn;

use crate::graph::topological_order;
use crate::models::LinkKind;

/// A task as the CPM pass sees it: a date, a duration, nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpmTask {
    /// Unique task identifier.
    pub id: String,
    /// Assigned start date, used when the task has no predecessors.
    pub start: NaiveDate,
    /// Duration in whole days.
    pub duration_days: i64,
}

impl CpmTask {
    /// Creates a CPM task.
    pub fn new(id: impl Into<String>, start: NaiveDate, duration_days: i64) -> Self {
        Self {
            id: id.into(),
            start,
            duration_days,
        }
    }
}

/// A typed, lagged dependency between two tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    /// Predecessor task ID.
    pub predecessor: String,
    /// Successor task ID.
    pub successor: String,
    /// Relation kind.
    pub kind: LinkKind,
    /// Lag in whole days (may be negative).
    pub lag_days: i64,
}

impl Dependency {
    /// Creates a zero-lag finish-to-start dependency.
    pub fn new(predecessor: impl Into<String>, successor: impl Into<String>) -> Self {
        Self {
            predecessor: predecessor.into(),
            successor: successor.into(),
            kind: LinkKind::FinishToStart,
            lag_days: 0,
        }
    }

    /// Sets the relation kind.
    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the lag.
    pub fn with_lag(mut self, lag_days: i64) -> Self {
        self.lag_days = lag_days;
        self
    }
}

/// Timing computed for one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpmResult {
    /// Earliest start date.
    pub early_start: NaiveDate,
    /// Earliest finish date (inclusive).
    pub early_finish: NaiveDate,
    /// Latest start date.
    pub late_start: NaiveDate,
    /// Latest finish date (inclusive).
    pub late_finish: NaiveDate,
    /// Days the task can slip without moving the project end.
    pub total_float: i64,
    /// Whether the task is on the critical path (`total_float == 0`).
    pub is_critical: bool,
}

/// Forward/backward critical-path calculator.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_planboard::cpm::{CpmCalculator, CpmTask, Dependency};
///
/// let day0 = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let tasks = vec![
///     CpmTask::new("a", day0, 2),
///     CpmTask::new("b", day0, 3),
/// ];
/// let deps = vec![Dependency::new("a", "b")];
///
/// let timing = CpmCalculator::new().compute(&tasks, &deps);
/// assert!(timing["a"].is_critical && timing["b"].is_critical);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CpmCalculator {
    deadline: Option<NaiveDate>,
}

impl CpmCalculator {
    /// Creates a calculator bounded by the project's own earliest end.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bounds the backward pass by a deadline date instead of the
    /// earliest project end (inclusive last allowed finish date).
    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Runs both passes and returns per-task timing keyed by task ID.
    ///
    /// Dependencies naming unknown tasks are ignored. Recompute whenever
    /// tasks or dependencies change; results are a pure function of the
    /// inputs.
    pub fn compute(
        &self,
        tasks: &[CpmTask],
        dependencies: &[Dependency],
    ) -> HashMap<String, CpmResult> {
        // Whole-day offsets from the earliest assigned start.
        let Some(epoch) = tasks.iter().map(|t| t.start).min() else {
            return HashMap::new();
        };
        let day = |date: NaiveDate| (date - epoch).num_days();
        let date = |offset: i64| epoch + Duration::days(offset);

        let by_id: HashMap<&str, &CpmTask> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
        let ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        let order = match topological_order(
            &ids,
            dependencies
                .iter()
                .map(|d| (d.predecessor.clone(), d.successor.clone())),
        ) {
            Ok(order) => order,
            Err(err) => {
                warn!(
                    stuck = ?err.stuck,
                    "dependency graph is cyclic; using task order as given"
                );
                ids.iter().map(|s| s.to_string()).collect()
            }
        };

        let mut incoming: HashMap<&str, Vec<&Dependency>> = HashMap::new();
        let mut outgoing: HashMap<&str, Vec<&Dependency>> = HashMap::new();
        for dep in dependencies {
            if !by_id.contains_key(dep.predecessor.as_str())
                || !by_id.contains_key(dep.successor.as_str())
            {
                continue;
            }
            incoming.entry(dep.successor.as_str()).or_default().push(dep);
            outgoing.entry(dep.predecessor.as_str()).or_default().push(dep);
        }

        // Forward pass: ES = max per-kind constraint over incoming edges,
        // or the assigned start when there are none.
        let mut es: HashMap<String, i64> = HashMap::new();
        let mut ef: HashMap<String, i64> = HashMap::new();
        for id in &order {
            let task = by_id[id.as_str()];
            let d = task.duration_days;
            let mut start = None;
            for dep in incoming.get(id.as_str()).into_iter().flatten() {
                let pred = dep.predecessor.as_str();
                // In a cyclic fallback a predecessor may be unprocessed
                let (Some(&pes), Some(&pef)) = (es.get(pred), ef.get(pred)) else {
                    continue;
                };
                let bound = match dep.kind {
                    LinkKind::FinishToStart => pef + dep.lag_days + 1,
                    LinkKind::StartToStart => pes + dep.lag_days,
                    LinkKind::FinishToFinish => pef + dep.lag_days - d + 1,
                    LinkKind::StartToFinish => pes + dep.lag_days - d + 1,
                };
                start = Some(start.map_or(bound, |s: i64| s.max(bound)));
            }
            let start = start.unwrap_or_else(|| day(task.start));
            es.insert(id.clone(), start);
            ef.insert(id.clone(), start + d - 1);
        }

        let project_end = self
            .deadline
            .map(day)
            .unwrap_or_else(|| ef.values().copied().max().unwrap_or(0));

        // Backward pass in reverse order: LF = min per-kind constraint
        // over outgoing edges, or the project end.
        let mut ls: HashMap<String, i64> = HashMap::new();
        let mut lf: HashMap<String, i64> = HashMap::new();
        for id in order.iter().rev() {
            let task = by_id[id.as_str()];
            let d = task.duration_days;
            let mut finish = None;
            for dep in outgoing.get(id.as_str()).into_iter().flatten() {
                let succ = dep.successor.as_str();
                let (Some(&sls), Some(&slf)) = (ls.get(succ), lf.get(succ)) else {
                    continue;
                };
                let bound = match dep.kind {
                    LinkKind::FinishToStart => sls - dep.lag_days - 1,
                    LinkKind::StartToStart => sls - dep.lag_days + d - 1,
                    LinkKind::FinishToFinish => slf - dep.lag_days,
                    LinkKind::StartToFinish => slf - dep.lag_days + d - 1,
                };
                finish = Some(finish.map_or(bound, |f: i64| f.min(bound)));
            }
            let finish = finish.unwrap_or(project_end);
            lf.insert(id.clone(), finish);
            ls.insert(id.clone(), finish - d + 1);
        }

        order
            .into_iter()
            .map(|id| {
                let total_float = ls[&id] - es[&id];
                let result = CpmResult {
                    early_start: date(es[&id]),
                    early_finish: date(ef[&id]),
                    late_start: date(ls[&id]),
                    late_finish: date(lf[&id]),
                    total_float,
                    is_critical: total_float == 0,
                };
                (id, result)
            })
            .collect()
    }
}
