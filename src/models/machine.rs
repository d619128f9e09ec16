//! Machine model.
//!
//! A machine is an exclusive resource: it executes at most one task at a
//! time. Machines own a display slot (row) on the timeline but no
//! scheduling state of their own — task intervals carry the schedule.
//!
//! # Reference
//! Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 1.2

use serde::{Deserialize, Serialize};

/// An exclusive resource that executes at most one task at a time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Display row on the timeline (0-indexed).
    pub slot: usize,
}

impl Machine {
    /// Creates a new machine with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            slot: 0,
        }
    }

    /// Sets the machine name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the display slot.
    pub fn with_slot(mut self, slot: usize) -> Self {
        self.slot = slot;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_machine_builder() {
        let m = Machine::new("M1").with_name("Lathe 1").with_slot(3);
        assert_eq!(m.id, "M1");
        assert_eq!(m.name, "Lathe 1");
        assert_eq!(m.slot, 3);
    }

    #[test]
    fn test_machine_defaults() {
        let m = Machine::new("M2");
        assert!(m.name.is_empty());
        assert_eq!(m.slot, 0);
    }
}
