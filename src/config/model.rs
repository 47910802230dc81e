// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::engine::EngineOptions;
use crate::exec::{WorkerEndpoint, WorkerSkill};

/// Raw configuration as read from a TOML file, before validation.
///
/// ```toml
/// [engine]
/// max_concurrency = 8
/// max_context_chars = 0
/// request_timeout_secs = 600
///
/// [discovery]
/// urls = ["http://localhost:10005"]
///
/// [worker."Math Agent"]
/// url = "http://localhost:10004"
/// description = "Arithmetic and unit conversion"
/// ```
///
/// Every section is optional, but validation requires at least one worker
/// or one discovery url.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub discovery: DiscoverySection,

    /// Statically configured workers, keyed by display name.
    #[serde(default)]
    pub worker: BTreeMap<String, WorkerConfig>,
}

/// Validated configuration. Only obtainable through `TryFrom<RawConfigFile>`
/// (see `validate.rs`).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub engine: EngineSection,
    pub discovery: DiscoverySection,
    pub worker: BTreeMap<String, WorkerConfig>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        engine: EngineSection,
        discovery: DiscoverySection,
        worker: BTreeMap<String, WorkerConfig>,
    ) -> Self {
        Self {
            engine,
            discovery,
            worker,
        }
    }

    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_concurrency: self.engine.max_concurrency,
            max_context_chars: self.engine.max_context_chars,
        }
    }

    /// Static workers as endpoints, in name order.
    pub fn worker_endpoints(&self) -> Vec<WorkerEndpoint> {
        self.worker
            .iter()
            .map(|(name, cfg)| WorkerEndpoint {
                name: name.clone(),
                url: cfg.url.clone(),
                description: cfg.description.clone(),
                skills: cfg.skills.clone(),
            })
            .collect()
    }
}

/// `[engine]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Upper bound on concurrent worker calls within a wave.
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Truncate injected dependency results to this many characters.
    /// `0` injects them whole.
    #[serde(default)]
    pub max_context_chars: usize,

    /// Timeout applied to every HTTP request made to a worker.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_max_concurrency() -> usize {
    8
}

fn default_request_timeout_secs() -> u64 {
    600
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            max_concurrency: default_max_concurrency(),
            max_context_chars: 0,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// `[discovery]` section: base urls whose agent cards are fetched at startup.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DiscoverySection {
    #[serde(default)]
    pub urls: Vec<String>,
}

/// `[worker.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkerConfig {
    /// JSON-RPC endpoint the worker listens on.
    pub url: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub skills: Vec<WorkerSkill>,
}
