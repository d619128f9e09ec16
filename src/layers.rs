//! Solution layers.
//!
//! A layer is a named, sparse overlay on the base board: per-task field
//! overrides produced by a solver or CPM run, plus a metrics snapshot for
//! cross-layer comparison. Layers never mutate base state — effective
//! values are composed at read time, last visible layer winning per
//! field. Deleting a layer is always safe.
//!
//! Overrides are built by diffing a pre-run snapshot against the post-run
//! state ([`diff_snapshot`]); a field is stored only when its value
//! actually changed.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Task;
use crate::solver::DispatchRule;

/// Identifier of a layer within one [`LayerStack`].
pub type LayerId = u64;

/// What produced a layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Algorithm {
    /// A dispatch-rule solver run.
    Dispatch(DispatchRule),
    /// A critical-path pass.
    CriticalPath,
    /// Hand edits captured as a layer.
    Manual,
}

/// Sparse per-task field overrides.
///
/// `None` means "not overridden, read the base value". Runs never
/// unassign machines, so an override always names a machine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskOverride {
    /// Overridden machine assignment.
    pub machine: Option<String>,
    /// Overridden start offset.
    pub start: Option<i64>,
    /// Overridden duration.
    pub duration: Option<i64>,
    /// Overridden display row.
    pub row: Option<usize>,
}

impl TaskOverride {
    /// Creates an empty override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the start override.
    pub fn with_start(mut self, start: i64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the machine override.
    pub fn with_machine(mut self, machine: impl Into<String>) -> Self {
        self.machine = Some(machine.into());
        self
    }

    /// Sets the duration override.
    pub fn with_duration(mut self, duration: i64) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Sets the row override.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Whether no field is overridden.
    pub fn is_empty(&self) -> bool {
        self.machine.is_none() && self.start.is_none() && self.duration.is_none() && self.row.is_none()
    }

    /// Applies this override on top of a task, field by field.
    pub fn apply_to(&self, task: &mut Task) {
        if let Some(machine) = &self.machine {
            task.machine = Some(machine.clone());
        }
        if let Some(start) = self.start {
            task.start = start;
        }
        if let Some(duration) = self.duration {
            task.duration = duration;
        }
        if let Some(row) = self.row {
            task.row = row;
        }
    }
}

/// A named overlay of computed schedule values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    /// Identifier within the owning stack.
    pub id: LayerId,
    /// Display name.
    pub name: String,
    /// Producing algorithm.
    pub algorithm: Algorithm,
    /// Per-task overrides, keyed by task ID.
    pub overrides: HashMap<String, TaskOverride>,
    /// Named metric snapshot (makespan, utilization, ...).
    pub metrics: Vec<(String, f64)>,
    /// Whether the layer participates in display composition.
    pub visible: bool,
}

/// Layer operation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayerError {
    /// The referenced layer does not exist. No state was changed.
    #[error("no layer with id {0}")]
    NotFound(LayerId),
}

/// Ordered collection of layers over one board.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayerStack {
    layers: Vec<Layer>,
    next_id: LayerId,
}

impl LayerStack {
    /// Creates an empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a layer from precomputed overrides; returns its ID.
    ///
    /// New layers start visible. A no-op run yields an empty override map,
    /// which is a perfectly valid (if boring) layer.
    pub fn create_layer(
        &mut self,
        name: impl Into<String>,
        algorithm: Algorithm,
        overrides: HashMap<String, TaskOverride>,
    ) -> LayerId {
        let id = self.next_id;
        self.next_id += 1;
        self.layers.push(Layer {
            id,
            name: name.into(),
            algorithm,
            overrides,
            metrics: Vec::new(),
            visible: true,
        });
        id
    }

    /// All layers in creation order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Looks up a layer by ID.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    fn layer_mut(&mut self, id: LayerId) -> Result<&mut Layer, LayerError> {
        self.layers
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or(LayerError::NotFound(id))
    }

    /// Renames a layer.
    pub fn rename(&mut self, id: LayerId, name: impl Into<String>) -> Result<(), LayerError> {
        self.layer_mut(id)?.name = name.into();
        Ok(())
    }

    /// Replaces a layer's metric snapshot.
    pub fn update_metrics(
        &mut self,
        id: LayerId,
        metrics: Vec<(String, f64)>,
    ) -> Result<(), LayerError> {
        self.layer_mut(id)?.metrics = metrics;
        Ok(())
    }

    /// Toggles a layer's visibility flag.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<(), LayerError> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    /// Deletes a layer. Base state is untouched by construction.
    pub fn remove(&mut self, id: LayerId) -> Result<(), LayerError> {
        let before = self.layers.len();
        self.layers.retain(|l| l.id != id);
        if self.layers.len() == before {
            return Err(LayerError::NotFound(id));
        }
        Ok(())
    }

    /// Effective task values under the given layers, applied in the order
    /// listed: the last listed layer wins per field. Unknown IDs are
    /// skipped. The base task is never mutated.
    pub fn effective(&self, base: &Task, layer_ids: &[LayerId]) -> Task {
        let mut task = base.clone();
        for &id in layer_ids {
            if let Some(layer) = self.layer(id) {
                if let Some(ov) = layer.overrides.get(&base.id) {
                    ov.apply_to(&mut task);
                }
            }
        }
        task
    }

    /// Effective task values under all layers currently flagged visible,
    /// in creation order (most recent wins per field).
    pub fn effective_visible(&self, base: &Task) -> Task {
        let ids: Vec<LayerId> = self
            .layers
            .iter()
            .filter(|l| l.visible)
            .map(|l| l.id)
            .collect();
        self.effective(base, &ids)
    }
}

/// Computes the sparse override map between two task snapshots.
///
/// Only tasks present in both snapshots contribute, and only fields whose
/// values differ are stored. A run that changed nothing produces an empty
/// map.
pub fn diff_snapshot(before: &[Task], after: &[Task]) -> HashMap<String, TaskOverride> {
    let mut overrides = HashMap::new();
    for post in after {
        let Some(pre) = before.iter().find(|t| t.id == post.id) else {
            continue;
        };
        let mut ov = TaskOverride::new();
        if post.machine != pre.machine {
            ov.machine = post.machine.clone();
        }
        if post.start != pre.start {
            ov.start = Some(post.start);
        }
        if post.duration != pre.duration {
            ov.duration = Some(post.duration);
        }
        if post.row != pre.row {
            ov.row = Some(post.row);
        }
        if !ov.is_empty() {
            overrides.insert(post.id.clone(), ov);
        }
    }
    overrides
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_task() -> Task {
        Task::new("T1")
            .with_machine("M1")
            .with_start(0)
            .with_duration(5)
            .with_row(1)
    }

    #[test]
    fn test_noop_run_diffs_empty() {
        let before = vec![base_task()];
        let after = vec![base_task()];
        assert!(diff_snapshot(&before, &after).is_empty());
    }

    #[test]
    fn test_diff_is_sparse() {
        let before = vec![base_task()];
        let after = vec![base_task().with_start(7)];
        let diff = diff_snapshot(&before, &after);
        let ov = &diff["T1"];
        assert_eq!(ov.start, Some(7));
        assert_eq!(ov.machine, None);
        assert_eq!(ov.duration, None);
        assert_eq!(ov.row, None);
    }

    #[test]
    fn test_create_layer_from_noop_run() {
        let mut stack = LayerStack::new();
        let before = vec![base_task()];
        let id = stack.create_layer(
            "noop",
            Algorithm::Manual,
            diff_snapshot(&before, &before),
        );
        assert!(stack.layer(id).unwrap().overrides.is_empty());
    }

    #[test]
    fn test_effective_single_layer() {
        let mut stack = LayerStack::new();
        let mut overrides = HashMap::new();
        overrides.insert("T1".into(), TaskOverride::new().with_start(10));
        let id = stack.create_layer("spt", Algorithm::Dispatch(DispatchRule::Spt), overrides);

        let base = base_task();
        let effective = stack.effective(&base, &[id]);
        assert_eq!(effective.start, 10);
        // Un-overridden fields read through to base
        assert_eq!(effective.duration, 5);
        // Base untouched
        assert_eq!(base.start, 0);
    }

    #[test]
    fn test_last_visible_wins_per_field() {
        let mut stack = LayerStack::new();

        let mut first = HashMap::new();
        first.insert(
            "T1".into(),
            TaskOverride::new().with_start(10).with_row(9),
        );
        let a = stack.create_layer("first", Algorithm::Manual, first);

        let mut second = HashMap::new();
        second.insert("T1".into(), TaskOverride::new().with_start(20));
        let b = stack.create_layer("second", Algorithm::CriticalPath, second);

        let effective = stack.effective(&base_task(), &[a, b]);
        // Start: second layer wins. Row: only first overrides it.
        assert_eq!(effective.start, 20);
        assert_eq!(effective.row, 9);
    }

    #[test]
    fn test_effective_visible_respects_flags() {
        let mut stack = LayerStack::new();
        let mut overrides = HashMap::new();
        overrides.insert("T1".into(), TaskOverride::new().with_start(10));
        let id = stack.create_layer("hidden", Algorithm::Manual, overrides);
        stack.set_visible(id, false).unwrap();

        let effective = stack.effective_visible(&base_task());
        assert_eq!(effective.start, 0);
    }

    #[test]
    fn test_update_metrics() {
        let mut stack = LayerStack::new();
        let id = stack.create_layer("m", Algorithm::Manual, HashMap::new());
        stack
            .update_metrics(id, vec![("makespan".into(), 7.0)])
            .unwrap();
        assert_eq!(stack.layer(id).unwrap().metrics[0].1, 7.0);
    }

    #[test]
    fn test_unknown_layer_reported() {
        let mut stack = LayerStack::new();
        assert_eq!(
            stack.update_metrics(42, Vec::new()),
            Err(LayerError::NotFound(42))
        );
        assert_eq!(stack.rename(42, "x"), Err(LayerError::NotFound(42)));
        assert_eq!(stack.remove(42), Err(LayerError::NotFound(42)));
    }

    #[test]
    fn test_remove_layer_keeps_others() {
        let mut stack = LayerStack::new();
        let a = stack.create_layer("a", Algorithm::Manual, HashMap::new());
        let b = stack.create_layer("b", Algorithm::Manual, HashMap::new());
        stack.remove(a).unwrap();
        assert!(stack.layer(a).is_none());
        assert!(stack.layer(b).is_some());
    }

    #[test]
    fn test_layer_from_solver_run() {
        use crate::models::Instance;
        use crate::solver::solve;

        // Board tasks mirror the 2x2 instance, everything parked at t=0
        let instance = Instance::new("2x2", 2)
            .with_job(vec![(0, 3), (1, 2)])
            .with_job(vec![(1, 2), (0, 4)]);
        let mut tasks = Vec::new();
        for (j, job) in instance.jobs.iter().enumerate() {
            for (o, op) in job.iter().enumerate() {
                tasks.push(
                    Task::new(format!("J{j}O{o}"))
                        .with_machine(format!("M{}", op.machine))
                        .with_duration(op.duration),
                );
            }
        }

        let before = tasks.clone();
        let solution = solve(&instance, DispatchRule::Spt).unwrap();
        for (j, job) in solution.jobs.iter().enumerate() {
            for (o, op) in job.iter().enumerate() {
                let id = format!("J{j}O{o}");
                if let Some(task) = tasks.iter_mut().find(|t| t.id == id) {
                    task.start = op.start;
                }
            }
        }

        let mut stack = LayerStack::new();
        let id = stack.create_layer(
            "SPT",
            Algorithm::Dispatch(DispatchRule::Spt),
            diff_snapshot(&before, &tasks),
        );
        let layer = stack.layer(id).unwrap();

        // Only the second operations moved (both to t=3); first ops
        // stayed at 0 and must not be stored
        assert_eq!(layer.overrides.len(), 2);
        assert_eq!(layer.overrides["J0O1"].start, Some(3));
        assert_eq!(layer.overrides["J1O1"].start, Some(3));

        // Base stays parked; the layer supplies the schedule
        let effective = stack.effective(&before[1], &[id]);
        assert_eq!(effective.start, 3);
        assert_eq!(before[1].start, 0);
    }

    #[test]
    fn test_ids_not_reused_after_removal() {
        let mut stack = LayerStack::new();
        let a = stack.create_layer("a", Algorithm::Manual, HashMap::new());
        stack.remove(a).unwrap();
        let b = stack.create_layer("b", Algorithm::Manual, HashMap::new());
        assert_ne!(a, b);
    }
}
