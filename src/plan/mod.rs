// src/plan/mod.rs

//! Execution plans and their dependency graphs.
//!
//! - [`model`] holds the serde data model produced by the planner.
//! - [`loader`] reads plan files.
//! - [`graph`] validates a plan and exposes it as an adjacency map.
//! - [`readiness`] computes which tasks can run next.

pub mod graph;
pub mod loader;
pub mod model;
pub mod readiness;

pub use graph::PlanGraph;
pub use loader::{load_plan, parse_plan};
pub use model::{ExecutionPlan, PlanDocument, PlannerResponse, PlannerStatus, Task};
pub use readiness::{preview_waves, ready_tasks};
