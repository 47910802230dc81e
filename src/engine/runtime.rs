// src/engine/runtime.rs

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::AssertUnwindSafe;

use futures::FutureExt;
use futures::stream::{FuturesUnordered, StreamExt};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use crate::engine::aggregate::aggregate;
use crate::engine::core::{WaveCore, WaveStep};
use crate::engine::{DriverState, EngineOptions, PlanOutcome, TaskOutcome};
use crate::exec::{TaskDispatcher, TaskExecutor, WorkerRegistry};
use crate::plan::{ExecutionPlan, PlanGraph, Task};
use crate::types::TaskId;

/// Runs execution plans wave by wave.
///
/// This is the async shell around [`WaveCore`]: the core decides which tasks
/// form the next wave, the engine fans them out through the
/// [`TaskDispatcher`] and waits until every one of them has an outcome before
/// asking for the next wave.
pub struct Engine<E: TaskExecutor> {
    dispatcher: TaskDispatcher<E>,
    options: EngineOptions,
}

impl<E: TaskExecutor> fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("workers", &self.dispatcher.registry().names())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<E: TaskExecutor> Engine<E> {
    pub fn new(registry: WorkerRegistry, executor: E, options: EngineOptions) -> Self {
        let dispatcher = TaskDispatcher::new(registry, executor, options.max_context_chars);
        Self {
            dispatcher,
            options,
        }
    }

    /// Execute `plan` to completion.
    ///
    /// Never returns an error: malformed graphs and cycles yield a
    /// `structural_error` outcome, task failures yield `partial_success`.
    pub async fn run(&self, plan: &ExecutionPlan) -> PlanOutcome {
        info!(tasks = plan.tasks.len(), summary = %plan.summary, "starting plan execution");

        let graph = match PlanGraph::from_plan(plan) {
            Ok(graph) => graph,
            Err(err) => {
                warn!(error = %err, "plan rejected before execution");
                return aggregate(
                    &plan.summary,
                    DriverState::StructuralError(err),
                    BTreeMap::new(),
                );
            }
        };

        let tasks: BTreeMap<TaskId, &Task> = plan.tasks.iter().map(|t| (t.id, t)).collect();
        let mut core = WaveCore::new(graph);

        while let WaveStep::Dispatch(wave) = core.next_wave() {
            info!(
                wave = core.waves_dispatched(),
                tasks = ?wave,
                "dispatching wave"
            );
            let outcomes = self.run_wave(&core, &tasks, &wave).await;
            core.record_wave(outcomes);
        }

        let waves = core.waves_dispatched();
        let (state, results) = core.into_parts();
        let outcome = aggregate(&plan.summary, state, results);
        info!(status = ?outcome.status, waves, "plan execution finished");
        outcome
    }

    /// Dispatch every task of one wave and wait for all of them.
    async fn run_wave(
        &self,
        core: &WaveCore,
        tasks: &BTreeMap<TaskId, &Task>,
        wave: &[TaskId],
    ) -> Vec<(TaskId, TaskOutcome)> {
        let permits = wave.len().min(self.options.max_concurrency).max(1);
        let sem = Semaphore::new(permits);
        let prior = core.results();
        let mut futs = FuturesUnordered::new();

        for &id in wave {
            let Some(task) = tasks.get(&id).copied() else {
                continue;
            };
            let deps = core.graph().dependencies_of(id);
            let sem = &sem;

            futs.push(async move {
                let _permit = match sem.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => {
                        return (id, TaskOutcome::failure(task, "semaphore closed unexpectedly"));
                    }
                };

                let outcome = AssertUnwindSafe(self.dispatcher.dispatch(task, deps, prior))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|payload| {
                        let msg = panic_message(payload.as_ref());
                        warn!(task_id = id, panic = %msg, "task executor panicked");
                        TaskOutcome::failure(task, format!("executor panicked: {msg}"))
                    });

                (id, outcome)
            });
        }

        let mut outcomes = Vec::with_capacity(wave.len());
        while let Some((id, outcome)) = futs.next().await {
            debug!(task_id = id, status = ?outcome.status, "task resolved");
            outcomes.push((id, outcome));
        }
        outcomes
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
