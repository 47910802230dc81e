// src/exec/dispatcher.rs

//! Per-task dispatch: worker resolution, context injection, executor call.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::engine::TaskOutcome;
use crate::exec::backend::TaskExecutor;
use crate::exec::registry::WorkerRegistry;
use crate::plan::Task;
use crate::types::TaskId;

/// Resolves workers and runs single tasks through a [`TaskExecutor`].
///
/// `dispatch` never fails: every problem (unknown worker, executor error)
/// becomes a failed [`TaskOutcome`] for that task alone.
#[derive(Debug)]
pub struct TaskDispatcher<E> {
    registry: WorkerRegistry,
    executor: E,
    max_context_chars: usize,
}

impl<E: TaskExecutor> TaskDispatcher<E> {
    pub fn new(registry: WorkerRegistry, executor: E, max_context_chars: usize) -> Self {
        Self {
            registry,
            executor,
            max_context_chars,
        }
    }

    pub fn registry(&self) -> &WorkerRegistry {
        &self.registry
    }

    /// Run one task.
    ///
    /// `dependencies` are the task's deduplicated dependency ids, in plan
    /// order; `prior` holds every outcome recorded before this wave.
    pub async fn dispatch(
        &self,
        task: &Task,
        dependencies: &[TaskId],
        prior: &BTreeMap<TaskId, TaskOutcome>,
    ) -> TaskOutcome {
        let Some(worker) = self.registry.resolve(&task.worker_name) else {
            let available = self.registry.names();
            warn!(
                task_id = task.id,
                worker = %task.worker_name,
                ?available,
                "worker not found"
            );
            return TaskOutcome::failure(
                task,
                format!(
                    "worker '{}' not found. Available workers: {:?}",
                    task.worker_name, available
                ),
            );
        };

        let input = build_effective_input(&task.input, dependencies, prior, self.max_context_chars);

        info!(
            task_id = task.id,
            worker = %worker.name,
            url = %worker.url,
            "dispatching task"
        );
        debug!(task_id = task.id, input = %input, "effective task input");

        match self.executor.execute(worker, &input).await {
            Ok(text) => {
                info!(task_id = task.id, worker = %worker.name, "task succeeded");
                debug!(task_id = task.id, result = %text, "task result");
                TaskOutcome::success(task, text)
            }
            Err(err) => {
                warn!(task_id = task.id, worker = %worker.name, error = %err, "task failed");
                TaskOutcome::failure(task, err.to_string())
            }
        }
    }
}

/// Prepend the results of successful dependencies to a task's input.
///
/// Each successful dependency contributes one line,
/// `Previous result from task <id>: <result>`, in dependency order. Failed
/// dependencies and dependencies without an outcome are skipped. When no
/// dependency contributes, the input is returned unchanged.
///
/// `max_chars` truncates each excerpt; `0` keeps the full result.
pub fn build_effective_input(
    input: &str,
    dependencies: &[TaskId],
    prior: &BTreeMap<TaskId, TaskOutcome>,
    max_chars: usize,
) -> String {
    let context: Vec<String> = dependencies
        .iter()
        .filter_map(|dep| {
            let outcome = prior.get(dep)?;
            if !outcome.is_success() {
                return None;
            }
            Some(format!(
                "Previous result from task {dep}: {}",
                excerpt(outcome.text(), max_chars)
            ))
        })
        .collect();

    if context.is_empty() {
        return input.to_string();
    }

    format!("{}\n\nNow: {input}", context.join("\n"))
}

fn excerpt(text: &str, max_chars: usize) -> String {
    if max_chars == 0 || text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}
