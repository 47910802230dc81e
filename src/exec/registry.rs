// src/exec/registry.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::errors::{AgentdagError, Result};

/// A skill advertised by a worker (from config or its agent card).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerSkill {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// A registered worker and where to reach it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkerEndpoint {
    pub name: String,
    pub url: String,
    pub description: String,
    pub skills: Vec<WorkerSkill>,
}

impl WorkerEndpoint {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            description: String::new(),
            skills: Vec::new(),
        }
    }
}

/// Lookup key for a worker name: whitespace removed, lowercased.
///
/// `"Math Agent"`, `"math agent"` and `"MathAgent"` all resolve to the same
/// worker.
pub fn normalize_worker_name(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Immutable map from normalized worker name to endpoint.
///
/// Built once (from config and agent-card discovery) and handed to the
/// dispatcher; it is never mutated while a plan runs.
#[derive(Debug, Clone, Default)]
pub struct WorkerRegistry {
    workers: BTreeMap<String, WorkerEndpoint>,
}

impl WorkerRegistry {
    /// Build a registry, rejecting names that collide after normalization.
    pub fn from_workers(workers: impl IntoIterator<Item = WorkerEndpoint>) -> Result<Self> {
        let mut map: BTreeMap<String, WorkerEndpoint> = BTreeMap::new();

        for worker in workers {
            let key = normalize_worker_name(&worker.name);
            if key.is_empty() {
                return Err(AgentdagError::ConfigError(format!(
                    "worker name {:?} is empty after normalization",
                    worker.name
                )));
            }
            if let Some(existing) = map.get(&key) {
                return Err(AgentdagError::ConfigError(format!(
                    "worker names '{}' and '{}' refer to the same worker",
                    existing.name, worker.name
                )));
            }
            map.insert(key, worker);
        }

        Ok(Self { workers: map })
    }

    /// Find the worker registered under `name`, ignoring case and whitespace.
    pub fn resolve(&self, name: &str) -> Option<&WorkerEndpoint> {
        self.workers.get(&normalize_worker_name(name))
    }

    /// Display names of all registered workers.
    pub fn names(&self) -> Vec<&str> {
        self.workers.values().map(|w| w.name.as_str()).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WorkerEndpoint> {
        self.workers.values()
    }

    pub fn len(&self) -> usize {
        self.workers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workers.is_empty()
    }
}
