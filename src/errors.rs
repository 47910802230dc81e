// src/errors.rs

//! Crate-wide error types.
//!
//! [`AgentdagError`] covers everything around the engine (config, plan files,
//! IO, HTTP discovery). Per-task failures never travel through this type:
//! they are recorded as failed `TaskOutcome`s instead.

use thiserror::Error;

use crate::types::TaskId;

#[derive(Error, Debug)]
pub enum AgentdagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Plan error: {0}")]
    PlanError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Error returned by a [`TaskExecutor`](crate::exec::TaskExecutor) for a
/// single task call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutorError {
    /// The request never produced a response (connect, timeout, body read).
    #[error("transport error: {0}")]
    Transport(String),

    /// The worker answered with a non-success HTTP status.
    #[error("worker returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    /// The response could not be understood.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The worker reported an error of its own.
    #[error("{0}")]
    Remote(String),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, AgentdagError>;

/// Reasons a plan cannot be faithfully scheduled.
///
/// The first four are detected while building the graph, before anything is
/// dispatched. `Unschedulable` is raised by the wave driver when no task is
/// ready but some are still outstanding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("task id must be a positive integer (got {0})")]
    InvalidTaskId(TaskId),

    #[error("duplicate task id {0}")]
    DuplicateTaskId(TaskId),

    #[error("task {task} depends on unknown task {dependency}")]
    UnknownDependency { task: TaskId, dependency: TaskId },

    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    #[error("circular or unresolvable dependencies; tasks {remaining:?} can never run{}", cycle_suffix(.cycle, .blocked))]
    Unschedulable {
        remaining: Vec<TaskId>,
        cycle: Option<Vec<TaskId>>,
        /// Tasks outside the cycle that wait on it, directly or transitively.
        blocked: Vec<TaskId>,
    },
}

fn cycle_suffix(cycle: &Option<Vec<TaskId>>, blocked: &[TaskId]) -> String {
    match cycle {
        Some(ids) if blocked.is_empty() => format!(" (cycle through {ids:?})"),
        Some(ids) => format!(" (cycle through {ids:?}, blocking {blocked:?})"),
        None => String::new(),
    }
}
