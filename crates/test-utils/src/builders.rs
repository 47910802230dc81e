#![allow(dead_code)]

use std::collections::BTreeMap;

use agentdag::config::{ConfigFile, DiscoverySection, EngineSection, RawConfigFile, WorkerConfig};
use agentdag::exec::{WorkerEndpoint, WorkerRegistry};
use agentdag::plan::{ExecutionPlan, Task};
use agentdag::types::TaskId;

/// Builder for `ExecutionPlan`.
pub struct PlanBuilder {
    plan: ExecutionPlan,
}

impl PlanBuilder {
    pub fn new(summary: &str) -> Self {
        Self {
            plan: ExecutionPlan {
                tasks: Vec::new(),
                summary: summary.to_string(),
            },
        }
    }

    pub fn task(mut self, task: TaskBuilder) -> Self {
        self.plan.tasks.push(task.build());
        self
    }

    pub fn build(self) -> ExecutionPlan {
        self.plan
    }
}

/// Builder for `Task`. The description defaults to `"task <id>"`.
pub struct TaskBuilder {
    task: Task,
}

impl TaskBuilder {
    pub fn new(id: TaskId, worker: &str, input: &str) -> Self {
        Self {
            task: Task {
                id,
                worker_name: worker.to_string(),
                description: format!("task {id}"),
                input: input.to_string(),
                dependencies: Vec::new(),
            },
        }
    }

    pub fn after(mut self, dep: TaskId) -> Self {
        self.task.dependencies.push(dep);
        self
    }

    pub fn after_all(mut self, deps: &[TaskId]) -> Self {
        self.task.dependencies.extend_from_slice(deps);
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.task.description = description.to_string();
        self
    }

    pub fn build(self) -> Task {
        self.task
    }
}

/// Registry with one worker per name, each at a dummy url.
pub fn registry_of(names: &[&str]) -> WorkerRegistry {
    let workers = names
        .iter()
        .enumerate()
        .map(|(i, name)| WorkerEndpoint::new(*name, format!("http://worker-{i}.test")));
    WorkerRegistry::from_workers(workers).expect("worker names must not collide")
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                engine: EngineSection::default(),
                discovery: DiscoverySection::default(),
                worker: BTreeMap::new(),
            },
        }
    }

    pub fn with_worker(mut self, name: &str, url: &str) -> Self {
        self.config.worker.insert(
            name.to_string(),
            WorkerConfig {
                url: url.to_string(),
                description: String::new(),
                skills: Vec::new(),
            },
        );
        self
    }

    pub fn with_discovery_url(mut self, url: &str) -> Self {
        self.config.discovery.urls.push(url.to_string());
        self
    }

    pub fn with_max_concurrency(mut self, n: usize) -> Self {
        self.config.engine.max_concurrency = n;
        self
    }

    pub fn with_max_context_chars(mut self, n: usize) -> Self {
        self.config.engine.max_context_chars = n;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
