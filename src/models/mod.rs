//! Scheduling domain models.
//!
//! Core data types shared by the solver, the validator, the interactive
//! engine, and the layer stack. Two families live here:
//!
//! - **Instance side**: [`Instance`]/[`Op`] describe a job-shop problem,
//!   [`Solution`]/[`ScheduledOp`] a concrete schedule for it.
//! - **Live side**: [`Board`] aggregates [`Task`]s, [`Machine`]s, [`Job`]s
//!   and [`PrecedenceLink`]s under interactive editing, where feasibility
//!   is advisory rather than enforced.

mod board;
mod instance;
mod job;
mod link;
mod machine;
mod solution;
mod task;

pub use board::Board;
pub use instance::{Instance, InstanceError, Op};
pub use job::Job;
pub use link::{LinkKind, PrecedenceLink};
pub use machine::Machine;
pub use solution::{ScheduledOp, Solution};
pub use task::Task;
