// src/engine/core.rs

//! Pure wave state machine.
//!
//! [`WaveCore`] owns the completed set and the results map for one run and
//! decides what to dispatch next. It has no Tokio types and performs no IO;
//! the async shell in [`super::runtime`] executes the waves it hands out and
//! feeds the outcomes back once the whole wave has resolved.

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use crate::engine::{DriverState, TaskOutcome};
use crate::plan::PlanGraph;
use crate::plan::readiness::{ready_tasks, unschedulable};
use crate::types::TaskId;

/// Decision returned by [`WaveCore::next_wave`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaveStep {
    /// Dispatch these tasks concurrently, then call [`WaveCore::record_wave`].
    Dispatch(Vec<TaskId>),
    /// The run is over; inspect [`WaveCore::state`].
    Finished,
}

/// Per-run scheduling state.
///
/// Invariant: `completed` is a subset of the graph's ids and always has
/// exactly one entry per recorded outcome.
#[derive(Debug)]
pub struct WaveCore {
    graph: PlanGraph,
    completed: BTreeSet<TaskId>,
    results: BTreeMap<TaskId, TaskOutcome>,
    state: DriverState,
    waves_dispatched: usize,
}

impl WaveCore {
    pub fn new(graph: PlanGraph) -> Self {
        Self {
            graph,
            completed: BTreeSet::new(),
            results: BTreeMap::new(),
            state: DriverState::Running,
            waves_dispatched: 0,
        }
    }

    pub fn graph(&self) -> &PlanGraph {
        &self.graph
    }

    pub fn state(&self) -> &DriverState {
        &self.state
    }

    pub fn completed(&self) -> &BTreeSet<TaskId> {
        &self.completed
    }

    pub fn results(&self) -> &BTreeMap<TaskId, TaskOutcome> {
        &self.results
    }

    pub fn waves_dispatched(&self) -> usize {
        self.waves_dispatched
    }

    /// Compute the next wave, or transition to a terminal state.
    pub fn next_wave(&mut self) -> WaveStep {
        if self.state.is_terminal() {
            return WaveStep::Finished;
        }

        if self.completed.len() == self.graph.len() {
            info!(
                tasks = self.graph.len(),
                waves = self.waves_dispatched,
                "all tasks have an outcome; run completed"
            );
            self.state = DriverState::Completed;
            return WaveStep::Finished;
        }

        let ready = ready_tasks(&self.graph, &self.completed);
        if ready.is_empty() {
            let err = unschedulable(&self.graph, &self.completed);
            warn!(
                completed = self.completed.len(),
                total = self.graph.len(),
                error = %err,
                "no ready tasks but run is not finished; halting"
            );
            self.state = DriverState::StructuralError(err);
            return WaveStep::Finished;
        }

        self.waves_dispatched += 1;
        debug!(wave = self.waves_dispatched, tasks = ?ready, "next wave computed");
        WaveStep::Dispatch(ready)
    }

    /// Record the outcomes of a fully resolved wave.
    ///
    /// Outcomes for unknown ids, or for ids that already have an outcome, are
    /// dropped with a warning.
    pub fn record_wave(&mut self, outcomes: Vec<(TaskId, TaskOutcome)>) {
        for (id, outcome) in outcomes {
            if !self.graph.contains(id) {
                warn!(task_id = id, "outcome for unknown task; ignoring");
                continue;
            }
            if self.results.contains_key(&id) {
                warn!(task_id = id, "task already has an outcome; keeping the first one");
                continue;
            }

            debug!(task_id = id, status = ?outcome.status, "recording task outcome");
            self.results.insert(id, outcome);
            self.completed.insert(id);
        }
    }

    /// Consume the core, returning its terminal state and recorded outcomes.
    pub fn into_parts(self) -> (DriverState, BTreeMap<TaskId, TaskOutcome>) {
        (self.state, self.results)
    }
}
