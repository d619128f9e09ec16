//! Precedence links between tasks.
//!
//! A link orders two tasks with one of the four standard relation kinds
//! (finish-to-start, start-to-start, finish-to-finish, start-to-finish)
//! plus a signed lag. Links are constraints on the *validated* schedule;
//! the live model may violate them and is flagged, not rejected.
//!
//! # Relation semantics (lag in time units)
//!
//! | Kind | Constraint |
//! |------|-----------|
//! | FS | `target.start >= source.end + lag` |
//! | SS | `target.start >= source.start + lag` |
//! | FF | `target.end >= source.end + lag` |
//! | SF | `target.end >= source.start + lag` |
//!
//! # Reference
//! Brucker (2007), "Scheduling Algorithms", Ch. 2 (generalized precedence)

use serde::{Deserialize, Serialize};

use super::Task;

/// Relation kind of a precedence link.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LinkKind {
    /// Target starts after source finishes.
    #[default]
    FinishToStart,
    /// Target starts after source starts.
    StartToStart,
    /// Target finishes after source finishes.
    FinishToFinish,
    /// Target finishes after source starts.
    StartToFinish,
}

/// A directed ordering constraint between two tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrecedenceLink {
    /// Source (predecessor) task ID.
    pub source: String,
    /// Target (successor) task ID.
    pub target: String,
    /// Relation kind.
    pub kind: LinkKind,
    /// Minimum offset enforced by the relation (may be negative).
    pub lag: i64,
}

impl PrecedenceLink {
    /// Creates a zero-lag finish-to-start link.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: LinkKind::FinishToStart,
            lag: 0,
        }
    }

    /// Sets the relation kind.
    pub fn with_kind(mut self, kind: LinkKind) -> Self {
        self.kind = kind;
        self
    }

    /// Sets the lag.
    pub fn with_lag(mut self, lag: i64) -> Self {
        self.lag = lag;
        self
    }

    /// Whether this link touches the given task (as source or target).
    pub fn touches(&self, task_id: &str) -> bool {
        self.source == task_id || self.target == task_id
    }

    /// Earliest target start that satisfies this link, given the source's
    /// current position and the target's duration.
    pub fn required_target_start(&self, source: &Task, target_duration: i64) -> i64 {
        match self.kind {
            LinkKind::FinishToStart => source.end() + self.lag,
            LinkKind::StartToStart => source.start + self.lag,
            LinkKind::FinishToFinish => source.end() + self.lag - target_duration,
            LinkKind::StartToFinish => source.start + self.lag - target_duration,
        }
    }

    /// Whether the link is satisfied by the tasks' current positions.
    pub fn is_satisfied(&self, source: &Task, target: &Task) -> bool {
        target.start >= self.required_target_start(source, target.duration)
    }
}
