// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AgentdagError, Result};
use crate::exec::{WorkerEndpoint, WorkerRegistry};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AgentdagError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.engine, raw.discovery, raw.worker))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_engine(cfg)?;
    ensure_has_workers(cfg)?;
    validate_urls(cfg)?;
    validate_worker_names(cfg)?;
    Ok(())
}

fn validate_engine(cfg: &RawConfigFile) -> Result<()> {
    if cfg.engine.max_concurrency == 0 {
        return Err(AgentdagError::ConfigError(
            "[engine].max_concurrency must be >= 1 (got 0)".to_string(),
        ));
    }
    if cfg.engine.request_timeout_secs == 0 {
        return Err(AgentdagError::ConfigError(
            "[engine].request_timeout_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn ensure_has_workers(cfg: &RawConfigFile) -> Result<()> {
    if cfg.worker.is_empty() && cfg.discovery.urls.is_empty() {
        return Err(AgentdagError::ConfigError(
            "config must contain at least one [worker.<name>] section or a [discovery].urls entry"
                .to_string(),
        ));
    }
    Ok(())
}

fn validate_urls(cfg: &RawConfigFile) -> Result<()> {
    for (name, worker) in cfg.worker.iter() {
        check_url(&worker.url).map_err(|why| {
            AgentdagError::ConfigError(format!("worker '{name}' has an invalid url: {why}"))
        })?;
    }
    for url in cfg.discovery.urls.iter() {
        check_url(url).map_err(|why| {
            AgentdagError::ConfigError(format!("[discovery].urls entry {url:?} is invalid: {why}"))
        })?;
    }
    Ok(())
}

fn check_url(url: &str) -> std::result::Result<(), &'static str> {
    let url = url.trim();
    if url.is_empty() {
        return Err("url is empty");
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err("url must start with http:// or https://");
    }
    Ok(())
}

/// Names like `"Math Agent"` and `"mathagent"` would resolve to the same
/// worker; reject them up front.
fn validate_worker_names(cfg: &RawConfigFile) -> Result<()> {
    let endpoints = cfg
        .worker
        .iter()
        .map(|(name, w)| WorkerEndpoint::new(name.clone(), w.url.clone()));
    WorkerRegistry::from_workers(endpoints)?;
    Ok(())
}
