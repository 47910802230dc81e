// src/plan/model.rs

use serde::{Deserialize, Serialize};

use crate::errors::{AgentdagError, Result};
use crate::types::TaskId;

/// One unit of work, delegated to a single named worker.
///
/// Field names on the wire follow the planner's JSON output:
///
/// ```json
/// {
///   "agent_name": "Math Agent",
///   "task_description": "Multiply three by four",
///   "task_input": "What is 3 * 4?",
///   "order": 1,
///   "dependencies": []
/// }
/// ```
///
/// The plain names (`id`, `worker_name`, `description`, `input`) are accepted
/// as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    #[serde(rename = "order", alias = "id")]
    pub id: TaskId,

    #[serde(rename = "agent_name", alias = "worker_name")]
    pub worker_name: String,

    /// Free text, only used for reporting.
    #[serde(rename = "task_description", alias = "description", default)]
    pub description: String,

    /// Payload sent to the worker, before dependency context is prepended.
    #[serde(rename = "task_input", alias = "input")]
    pub input: String,

    /// Ids of tasks that must have an outcome before this one is dispatched.
    #[serde(default)]
    pub dependencies: Vec<TaskId>,
}

/// Ordered list of tasks plus a one-line statement of the overall intent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionPlan {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub summary: String,
}

impl ExecutionPlan {
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }
}

/// Status reported by the plan producer alongside (or instead of) a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlannerStatus {
    Planning,
    Ready,
    Error,
    InputRequired,
}

/// Full planner response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct PlannerResponse {
    pub status: PlannerStatus,
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub plan: Option<ExecutionPlan>,
    #[serde(default)]
    pub error: Option<String>,
}

impl PlannerResponse {
    /// Extract an executable plan from the response.
    ///
    /// A `planning` response that already carries a plan is treated as
    /// `ready`.
    pub fn into_plan(self) -> Result<ExecutionPlan> {
        match (self.status, self.plan) {
            (PlannerStatus::Ready | PlannerStatus::Planning, Some(plan)) => Ok(plan),
            (PlannerStatus::Ready | PlannerStatus::Planning, None) => Err(
                AgentdagError::PlanError("planner response contains no plan".to_string()),
            ),
            (PlannerStatus::InputRequired, _) => Err(AgentdagError::PlanError(format!(
                "planner needs more input: {}",
                self.question.as_deref().unwrap_or("(no question given)")
            ))),
            (PlannerStatus::Error, _) => Err(AgentdagError::PlanError(format!(
                "planner failed: {}",
                self.error.as_deref().unwrap_or("unable to create execution plan")
            ))),
        }
    }
}

/// Anything a plan file may contain.
///
/// An object with a top-level `status` key is a planner response; anything
/// else is read as a bare plan. Picking the shape first keeps serde's error
/// for that shape, such as the name of a missing field.
#[derive(Debug, Clone)]
pub enum PlanDocument {
    Plan(ExecutionPlan),
    Response(PlannerResponse),
}

impl PlanDocument {
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let is_response = value.as_object().is_some_and(|obj| obj.contains_key("status"));
        if is_response {
            Ok(PlanDocument::Response(serde_json::from_value(value)?))
        } else {
            Ok(PlanDocument::Plan(serde_json::from_value(value)?))
        }
    }

    pub fn into_plan(self) -> Result<ExecutionPlan> {
        match self {
            PlanDocument::Plan(plan) => Ok(plan),
            PlanDocument::Response(resp) => resp.into_plan(),
        }
    }
}
