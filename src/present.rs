// src/present.rs

//! Render a [`PlanOutcome`] for stdout.

use std::fmt::Write as _;

use crate::engine::{PlanOutcome, PlanStatus};
use crate::errors::{AgentdagError, Result};
use crate::types::{OutputFormat, TaskId};

pub fn render(outcome: &PlanOutcome, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => render_text(outcome),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(outcome)?),
    }
}

/// Human-readable execution summary.
///
/// ```text
/// Execution Summary: Convert and add (with 1 failed tasks)
///
/// Task 1 (Math Agent): 12
/// Task 2 (Weather Agent): ERROR: transport error: connect: ...
///
/// Failed tasks: [2]
/// ```
pub fn render_text(outcome: &PlanOutcome) -> Result<String> {
    let mut out = String::new();
    write_text(&mut out, outcome).map_err(|e| AgentdagError::Other(e.into()))?;
    Ok(out)
}

fn write_text(out: &mut String, outcome: &PlanOutcome) -> std::fmt::Result {
    writeln!(out, "Execution Summary: {}", outcome.summary)?;

    if !outcome.results.is_empty() {
        writeln!(out)?;
    }
    for (id, task) in &outcome.results {
        if task.is_success() {
            writeln!(out, "Task {id} ({}): {}", task.worker_name, task.text())?;
        } else {
            writeln!(out, "Task {id} ({}): ERROR: {}", task.worker_name, task.text())?;
        }
    }

    match outcome.status {
        PlanStatus::Completed => {}
        PlanStatus::PartialSuccess => {
            writeln!(out)?;
            writeln!(out, "Failed tasks: {}", id_list(&outcome.failed_tasks))?;
        }
        PlanStatus::StructuralError => {
            writeln!(out)?;
            writeln!(
                out,
                "Plan could not be executed: {}",
                outcome.error.as_deref().unwrap_or("structural error")
            )?;
        }
    }

    Ok(())
}

fn id_list(ids: &[TaskId]) -> String {
    let parts: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    format!("[{}]", parts.join(", "))
}
