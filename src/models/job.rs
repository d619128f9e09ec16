//! Job model.
//!
//! A job is an ordered sequence of operations (tasks). The declared order
//! is the job's routing: operation i+1 may not begin before operation i
//! completes in a feasible schedule.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1

use serde::{Deserialize, Serialize};

/// An ordered sequence of operations that must execute in sequence.
///
/// Holds task IDs in routing order. The tasks themselves live on the
/// [`Board`](super::Board); deleting a job cascades to its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Unique job identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Task IDs in routing order.
    pub operations: Vec<String>,
}

impl Job {
    /// Creates a new job with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            operations: Vec::new(),
        }
    }

    /// Sets the job name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Appends a task ID to the routing.
    pub fn with_operation(mut self, task_id: impl Into<String>) -> Self {
        self.operations.push(task_id.into());
        self
    }

    /// Number of operations in the routing.
    pub fn operation_count(&self) -> usize {
        self.operations.len()
    }

    /// Position of a task within the routing, if it belongs to this job.
    pub fn position_of(&self, task_id: &str) -> Option<usize> {
        self.operations.iter().position(|op| op == task_id)
    }
}
