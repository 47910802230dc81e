// src/engine/mod.rs

//! Execution-plan engine.
//!
//! This module ties together:
//! - the plan graph and readiness scanner (from [`crate::plan`])
//! - the wave state machine ([`core`]), which is pure and IO-free
//! - the async wave driver ([`runtime`]), which fans each wave out to the
//!   task dispatcher and waits on the barrier
//! - the result aggregator ([`aggregate`])

use std::collections::BTreeMap;

use serde::Serialize;

use crate::errors::StructuralError;
use crate::plan::Task;
use crate::types::TaskId;

/// Per-task status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Success,
    Failure,
}

/// What happened to one task. Recorded once per task and never overwritten.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub status: TaskStatus,
    pub worker_name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TaskOutcome {
    pub fn success(task: &Task, result: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Success,
            worker_name: task.worker_name.clone(),
            description: task.description.clone(),
            result: Some(result.into()),
            error: None,
        }
    }

    pub fn failure(task: &Task, error: impl Into<String>) -> Self {
        Self {
            status: TaskStatus::Failure,
            worker_name: task.worker_name.clone(),
            description: task.description.clone(),
            result: None,
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == TaskStatus::Success
    }

    /// The result text for a success, or the error message for a failure.
    pub fn text(&self) -> &str {
        match self.status {
            TaskStatus::Success => self.result.as_deref().unwrap_or_default(),
            TaskStatus::Failure => self.error.as_deref().unwrap_or_default(),
        }
    }
}

/// Plan-level status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanStatus {
    Completed,
    PartialSuccess,
    StructuralError,
}

/// Final output of [`Engine::run`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanOutcome {
    pub status: PlanStatus,
    pub summary: String,
    pub results: BTreeMap<TaskId, TaskOutcome>,
    /// Ids of failed tasks, ascending. Only populated for `partial_success`.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failed_tasks: Vec<TaskId>,
    /// Why the plan could not be scheduled. Only set for `structural_error`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// State of the wave driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DriverState {
    Running,
    Completed,
    StructuralError(StructuralError),
}

impl DriverState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, DriverState::Running)
    }
}

/// Engine tuning, taken from the `[engine]` config section.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    /// Upper bound on concurrent executor calls within one wave.
    pub max_concurrency: usize,
    /// Maximum characters of a dependency result injected as context;
    /// `0` means no limit.
    pub max_context_chars: usize,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_concurrency: 8,
            max_context_chars: 0,
        }
    }
}

pub mod aggregate;
pub mod core;
pub mod runtime;

pub use aggregate::aggregate;
pub use self::core::{WaveCore, WaveStep};
pub use runtime::Engine;
