// src/plan/loader.rs

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::Result;
use crate::plan::model::{ExecutionPlan, PlanDocument};

/// Parse a plan from JSON text.
///
/// Accepts either a bare `ExecutionPlan` or a full planner response. No
/// structural validation happens here; that is the graph's job, so that a
/// malformed graph still produces a `structural_error` outcome instead of a
/// load failure.
pub fn parse_plan(json: &str) -> Result<ExecutionPlan> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    let plan = PlanDocument::from_value(value)?.into_plan()?;
    debug!(tasks = plan.tasks.len(), summary = %plan.summary, "parsed execution plan");
    Ok(plan)
}

/// Read and parse a plan file.
pub fn load_plan(path: impl AsRef<Path>) -> Result<ExecutionPlan> {
    let contents = fs::read_to_string(path.as_ref())?;
    parse_plan(&contents)
}
