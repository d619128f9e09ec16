//! The live schedule board.
//!
//! [`Board`] is the owned aggregate behind an interactive timeline: tasks,
//! machines, jobs, precedence links, the optional deadline marker, and the
//! layer stack. Every engine operation borrows a board; there are no
//! ambient singletons and no internal locking — the hosting caller owns
//! the lifetime and serializes mutation.
//!
//! The board is a *live* representation: it accepts any edit, including
//! infeasible ones. Feasibility is reported by the conflict scanner
//! (`interactive::scan_conflicts`), never enforced here.

use serde::{Deserialize, Serialize};

use crate::layers::LayerStack;

use super::{Job, Machine, PrecedenceLink, Task};

/// Mutable shared scheduling state: the diagram model minus its rendering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Board {
    /// All tasks, in insertion order.
    pub tasks: Vec<Task>,
    /// All machines.
    pub machines: Vec<Machine>,
    /// All jobs.
    pub jobs: Vec<Job>,
    /// All precedence links.
    pub links: Vec<PrecedenceLink>,
    /// Global upper time bound, if set.
    pub deadline: Option<i64>,
    /// Solution layers overlaying this board.
    pub layers: LayerStack,
}

impl Board {
    /// Creates an empty board.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a task.
    pub fn add_task(&mut self, task: Task) {
        self.tasks.push(task);
    }

    /// Adds a machine.
    pub fn add_machine(&mut self, machine: Machine) {
        self.machines.push(machine);
    }

    /// Adds a job.
    pub fn add_job(&mut self, job: Job) {
        self.jobs.push(job);
    }

    /// Adds a precedence link.
    pub fn add_link(&mut self, link: PrecedenceLink) {
        self.links.push(link);
    }

    /// Looks up a task by ID.
    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Looks up a task mutably by ID.
    pub fn task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Removes a task and its incident links.
    ///
    /// Returns `false` if no such task exists.
    pub fn remove_task(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        if self.tasks.len() == before {
            return false;
        }
        self.links.retain(|l| !l.touches(id));
        for job in &mut self.jobs {
            job.operations.retain(|op| op != id);
        }
        true
    }

    /// Removes a machine, unassigning its tasks.
    ///
    /// Tasks survive with `machine = None`; links are untouched.
    pub fn remove_machine(&mut self, id: &str) -> bool {
        let before = self.machines.len();
        self.machines.retain(|m| m.id != id);
        if self.machines.len() == before {
            return false;
        }
        for task in &mut self.tasks {
            if task.machine.as_deref() == Some(id) {
                task.machine = None;
            }
        }
        true
    }

    /// Removes a job and all of its operations (cascades through
    /// [`remove_task`](Self::remove_task), dropping incident links too).
    pub fn remove_job(&mut self, id: &str) -> bool {
        let Some(pos) = self.jobs.iter().position(|j| j.id == id) else {
            return false;
        };
        let operations = self.jobs[pos].operations.clone();
        self.jobs.remove(pos);
        for task_id in operations {
            self.remove_task(&task_id);
        }
        true
    }

    /// Removes a link by endpoints, ignoring kind and lag.
    pub fn remove_link(&mut self, source: &str, target: &str) -> bool {
        let before = self.links.len();
        self.links
            .retain(|l| !(l.source == source && l.target == target));
        self.links.len() != before
    }

    /// Sets the deadline marker.
    pub fn set_deadline(&mut self, time: i64) {
        self.deadline = Some(time);
    }

    /// Clears the deadline marker.
    pub fn clear_deadline(&mut self) {
        self.deadline = None;
    }

    /// Makespan: latest end across all tasks, 0 when empty.
    pub fn makespan(&self) -> i64 {
        self.tasks.iter().map(Task::end).max().unwrap_or(0)
    }

    /// Tasks assigned to a machine, sorted by start.
    pub fn machine_timeline(&self, machine_id: &str) -> Vec<&Task> {
        let mut tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.machine.as_deref() == Some(machine_id))
            .collect();
        tasks.sort_by_key(|t| t.start);
        tasks
    }

    /// Links whose target is the given task.
    pub fn incoming_links(&self, task_id: &str) -> Vec<&PrecedenceLink> {
        self.links.iter().filter(|l| l.target == task_id).collect()
    }

    /// Links whose source is the given task.
    pub fn outgoing_links(&self, task_id: &str) -> Vec<&PrecedenceLink> {
        self.links.iter().filter(|l| l.source == task_id).collect()
    }
}
