// src/exec/mod.rs

//! Task execution layer.
//!
//! - [`backend`] defines the `TaskExecutor` trait the engine talks to.
//! - [`registry`] maps worker names to endpoints.
//! - [`dispatcher`] resolves a task's worker, injects dependency context and
//!   turns executor errors into failed outcomes.
//! - [`http`] is the production A2A client and agent-card discovery.

pub mod backend;
pub mod dispatcher;
pub mod http;
pub mod registry;

pub use backend::{ExecuteFuture, TaskExecutor};
pub use dispatcher::{TaskDispatcher, build_effective_input};
pub use http::{
    A2aHttpExecutor, AgentCard, discover_workers, fetch_agent_card, parse_send_response,
};
pub use registry::{WorkerEndpoint, WorkerRegistry, WorkerSkill, normalize_worker_name};
