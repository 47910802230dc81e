// src/plan/readiness.rs

//! Frontier computation.
//!
//! A task is ready when it has no outcome yet and every one of its
//! dependencies has *some* outcome. A failed dependency still counts as
//! completed: downstream tasks run anyway, just without that dependency's
//! result as context.

use std::collections::BTreeSet;

use crate::errors::StructuralError;
use crate::plan::graph::PlanGraph;
use crate::types::TaskId;

/// Ids of tasks that can be dispatched now, ascending.
pub fn ready_tasks(graph: &PlanGraph, completed: &BTreeSet<TaskId>) -> Vec<TaskId> {
    graph
        .task_ids()
        .filter(|id| !completed.contains(id))
        .filter(|id| {
            graph
                .dependencies_of(*id)
                .iter()
                .all(|dep| completed.contains(dep))
        })
        .collect()
}

/// The waves the driver would dispatch if every task produced an outcome.
///
/// Used for `--dry-run`; nothing is executed.
pub fn preview_waves(graph: &PlanGraph) -> Result<Vec<Vec<TaskId>>, StructuralError> {
    let mut completed = BTreeSet::new();
    let mut waves = Vec::new();

    while completed.len() < graph.len() {
        let wave = ready_tasks(graph, &completed);
        if wave.is_empty() {
            return Err(unschedulable(graph, &completed));
        }
        completed.extend(wave.iter().copied());
        waves.push(wave);
    }

    Ok(waves)
}

/// Build the error for a graph whose remaining tasks can never become ready.
pub fn unschedulable(graph: &PlanGraph, completed: &BTreeSet<TaskId>) -> StructuralError {
    let remaining: BTreeSet<TaskId> = graph
        .task_ids()
        .filter(|id| !completed.contains(id))
        .collect();
    let cycle = graph.find_cycle(&remaining);
    let blocked = cycle
        .as_deref()
        .map(|ids| graph.downstream_of(ids))
        .unwrap_or_default();

    StructuralError::Unschedulable {
        remaining: remaining.into_iter().collect(),
        cycle,
        blocked,
    }
}
