// src/exec/backend.rs

//! Pluggable task executor abstraction.
//!
//! The dispatcher talks to a `TaskExecutor` instead of an HTTP client
//! directly. This makes it easy to swap in a scripted executor in tests
//! while keeping the production A2A client in [`super::http`].
//!
//! Implementations must be safe to call concurrently: every task of a wave
//! goes through the same executor at the same time.

use std::future::Future;
use std::pin::Pin;

use crate::errors::ExecutorError;
use crate::exec::registry::WorkerEndpoint;

/// Boxed future returned by [`TaskExecutor::execute`].
pub type ExecuteFuture<'a> =
    Pin<Box<dyn Future<Output = std::result::Result<String, ExecutorError>> + Send + 'a>>;

/// Performs one task on one worker and returns the worker's text reply.
pub trait TaskExecutor: Send + Sync {
    /// Send `input` to `worker` and wait for its answer.
    fn execute<'a>(&'a self, worker: &'a WorkerEndpoint, input: &'a str) -> ExecuteFuture<'a>;
}

impl<T: TaskExecutor + ?Sized> TaskExecutor for std::sync::Arc<T> {
    fn execute<'a>(&'a self, worker: &'a WorkerEndpoint, input: &'a str) -> ExecuteFuture<'a> {
        (**self).execute(worker, input)
    }
}
