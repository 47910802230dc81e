use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use agentdag::errors::ExecutorError;
use agentdag::exec::{ExecuteFuture, TaskExecutor, WorkerEndpoint};

/// What the scripted executor does for a matching call.
#[derive(Debug, Clone)]
pub enum Behaviour {
    /// Succeed with this text.
    Reply(String),
    /// Fail with this error.
    Fail(ExecutorError),
    /// Panic inside the executor future.
    Panic(String),
    /// Succeed, returning the effective input unchanged.
    Echo,
}

#[derive(Debug, Clone)]
struct Rule {
    input_suffix: String,
    behaviour: Behaviour,
    delay: Option<Duration>,
}

/// One observed executor call.
#[derive(Debug, Clone)]
pub struct CallRecord {
    pub worker: String,
    pub input: String,
    /// Global sequence number taken when the call started.
    pub started: usize,
    /// Global sequence number taken when the call finished (0 if it panicked).
    pub finished: usize,
}

#[derive(Debug, Default)]
struct Shared {
    rules: Mutex<Vec<Rule>>,
    calls: Mutex<Vec<CallRecord>>,
    seq: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A fake executor driven by rules matched against the task input.
///
/// A rule matches when the effective input ends with the task's raw input,
/// which holds whether or not dependency context was prepended. The longest
/// matching suffix wins; unmatched calls fall back to [`Behaviour::Echo`].
///
/// Clones share state, so a test can keep a handle while the engine owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct ScriptedExecutor {
    shared: Arc<Shared>,
}

impl ScriptedExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(self, input: &str, behaviour: Behaviour) -> Self {
        self.push_rule(input, behaviour, None);
        self
    }

    pub fn on_delayed(self, input: &str, delay: Duration, behaviour: Behaviour) -> Self {
        self.push_rule(input, behaviour, Some(delay));
        self
    }

    pub fn reply(self, input: &str, text: &str) -> Self {
        self.on(input, Behaviour::Reply(text.to_string()))
    }

    pub fn fail(self, input: &str, message: &str) -> Self {
        self.on(input, Behaviour::Fail(ExecutorError::Remote(message.to_string())))
    }

    fn push_rule(&self, input: &str, behaviour: Behaviour, delay: Option<Duration>) {
        self.shared.rules.lock().unwrap().push(Rule {
            input_suffix: input.to_string(),
            behaviour,
            delay,
        });
    }

    /// Calls in the order they started.
    pub fn calls(&self) -> Vec<CallRecord> {
        let mut calls = self.shared.calls.lock().unwrap().clone();
        calls.sort_by_key(|c| c.started);
        calls
    }

    /// The recorded call whose input ends with `input`.
    pub fn call_for(&self, input: &str) -> Option<CallRecord> {
        self.calls()
            .into_iter()
            .filter(|c| c.input.ends_with(input))
            .max_by_key(|c| c.input.len())
    }

    pub fn call_count(&self) -> usize {
        self.shared.calls.lock().unwrap().len()
    }

    /// Highest number of calls observed running at the same time.
    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    fn find_rule(&self, input: &str) -> Option<Rule> {
        self.shared
            .rules
            .lock()
            .unwrap()
            .iter()
            .filter(|r| input.ends_with(&r.input_suffix))
            .max_by_key(|r| r.input_suffix.len())
            .cloned()
    }
}

impl TaskExecutor for ScriptedExecutor {
    fn execute<'a>(&'a self, worker: &'a WorkerEndpoint, input: &'a str) -> ExecuteFuture<'a> {
        Box::pin(async move {
            let shared = &self.shared;
            let started = shared.seq.fetch_add(1, Ordering::SeqCst) + 1;
            let now = shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            shared.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let index = {
                let mut calls = shared.calls.lock().unwrap();
                calls.push(CallRecord {
                    worker: worker.name.clone(),
                    input: input.to_string(),
                    started,
                    finished: 0,
                });
                calls.len() - 1
            };

            let rule = self.find_rule(input);
            let delay = rule.as_ref().and_then(|r| r.delay);
            let behaviour = rule.map(|r| r.behaviour).unwrap_or(Behaviour::Echo);

            // Yield at least once so concurrent calls overlap.
            match delay {
                Some(d) => tokio::time::sleep(d).await,
                None => tokio::task::yield_now().await,
            }

            shared.in_flight.fetch_sub(1, Ordering::SeqCst);

            if let Behaviour::Panic(msg) = &behaviour {
                panic!("{msg}");
            }

            let finished = shared.seq.fetch_add(1, Ordering::SeqCst) + 1;
            shared.calls.lock().unwrap()[index].finished = finished;

            match behaviour {
                Behaviour::Reply(text) => Ok(text),
                Behaviour::Fail(err) => Err(err),
                Behaviour::Echo => Ok(input.to_string()),
                Behaviour::Panic(_) => unreachable!(),
            }
        })
    }
}
