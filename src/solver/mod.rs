//! Dispatch-rule job-shop solver.
//!
//! Builds feasible schedules with greedy priority heuristics. One
//! event-driven simulation loop ([`sim`]) serves the whole closed set of
//! rules ([`DispatchRule`]); [`solve_multiple`] races all five and keeps
//! the lowest makespan.
//!
//! # Usage
//!
//! ```
//! use u_planboard::models::Instance;
//! use u_planboard::solver::{solve, solve_multiple, DispatchRule};
//!
//! let instance = Instance::new("demo", 2)
//!     .with_job(vec![(0, 3), (1, 2)])
//!     .with_job(vec![(1, 2), (0, 4)]);
//!
//! let spt = solve(&instance, DispatchRule::Spt).unwrap();
//! let best = solve_multiple(&instance).unwrap();
//! assert!(best.makespan <= spt.makespan);
//! ```
//!
//! # References
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod rules;
mod sim;

pub use rules::DispatchRule;
pub use sim::{solve, solve_multiple};
