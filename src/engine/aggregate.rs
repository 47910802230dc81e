// src/engine/aggregate.rs

use std::collections::BTreeMap;

use tracing::warn;

use crate::engine::{DriverState, PlanOutcome, PlanStatus, TaskOutcome};
use crate::types::TaskId;

/// Fold per-task outcomes into the plan-level outcome.
///
/// - structural error: status `structural_error`, results as recorded so far
/// - completed, no failures: status `completed`
/// - completed, some failures: status `partial_success`, `failed_tasks`
///   ascending, summary annotated with the failure count
pub fn aggregate(
    summary: &str,
    state: DriverState,
    results: BTreeMap<TaskId, TaskOutcome>,
) -> PlanOutcome {
    if state == DriverState::Running {
        warn!("aggregating a run that never reached a terminal state");
    }

    match state {
        DriverState::StructuralError(err) => PlanOutcome {
            status: PlanStatus::StructuralError,
            summary: summary.to_string(),
            results,
            failed_tasks: Vec::new(),
            error: Some(err.to_string()),
        },
        DriverState::Completed | DriverState::Running => {
            // BTreeMap iteration keeps the ids ascending.
            let failed_tasks: Vec<TaskId> = results
                .iter()
                .filter(|(_, outcome)| !outcome.is_success())
                .map(|(id, _)| *id)
                .collect();

            if failed_tasks.is_empty() {
                PlanOutcome {
                    status: PlanStatus::Completed,
                    summary: summary.to_string(),
                    results,
                    failed_tasks,
                    error: None,
                }
            } else {
                warn!(failed = ?failed_tasks, "some tasks failed");
                PlanOutcome {
                    status: PlanStatus::PartialSuccess,
                    summary: format!("{summary} (with {} failed tasks)", failed_tasks.len()),
                    results,
                    failed_tasks,
                    error: None,
                }
            }
        }
    }
}
