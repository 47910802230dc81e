// src/exec/http.rs

//! A2A worker client over JSON-RPC 2.0 (`message/send`), plus agent-card
//! discovery.

use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{ExecutorError, Result};
use crate::exec::backend::{ExecuteFuture, TaskExecutor};
use crate::exec::registry::{WorkerEndpoint, WorkerSkill};

const BODY_PREVIEW_LIMIT: usize = 512;
const AGENT_CARD_PATH: &str = "/.well-known/agent.json";

/// Production executor: one `message/send` call per task.
#[derive(Debug, Clone)]
pub struct A2aHttpExecutor {
    client: reqwest::Client,
}

impl A2aHttpExecutor {
    /// Build an executor whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    async fn send_message(
        &self,
        worker: &WorkerEndpoint,
        text: &str,
    ) -> std::result::Result<String, ExecutorError> {
        let message_id = Uuid::new_v4().simple().to_string();
        let request = json!({
            "jsonrpc": "2.0",
            "id": message_id,
            "method": "message/send",
            "params": {
                "message": {
                    "role": "user",
                    "messageId": message_id,
                    "parts": [{ "kind": "text", "text": text }],
                }
            }
        });

        debug!(worker = %worker.name, url = %worker.url, %message_id, "sending message/send");

        let resp = self
            .client
            .post(&worker.url)
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = resp.status();
        let body = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(ExecutorError::Status {
                code: status.as_u16(),
                body: preview_body(&body),
            });
        }

        let value: Value = serde_json::from_str(&body).map_err(|err| {
            ExecutorError::Protocol(format!(
                "invalid JSON-RPC response: {err} | body={}",
                preview_body(&body)
            ))
        })?;

        parse_send_response(&value)
    }
}

impl TaskExecutor for A2aHttpExecutor {
    fn execute<'a>(&'a self, worker: &'a WorkerEndpoint, input: &'a str) -> ExecuteFuture<'a> {
        Box::pin(self.send_message(worker, input))
    }
}

fn transport_error(err: reqwest::Error) -> ExecutorError {
    let kind = if err.is_timeout() {
        "timeout"
    } else if err.is_connect() {
        "connect"
    } else if err.is_body() || err.is_decode() {
        "body"
    } else {
        "request"
    };
    ExecutorError::Transport(format!("{kind}: {err}"))
}

/// Pull the reply text out of a JSON-RPC `message/send` response.
///
/// The `result` may be a message (text in `parts`) or a task (text in
/// `status.message.parts`, then in `artifacts[*].parts`). The first
/// non-empty text part wins and is trimmed.
pub fn parse_send_response(value: &Value) -> std::result::Result<String, ExecutorError> {
    if let Some(err) = value.get("error") {
        let message = err
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown error");
        return Err(match err.get("code").and_then(Value::as_i64) {
            Some(code) => ExecutorError::Remote(format!("{message} (code {code})")),
            None => ExecutorError::Remote(message.to_string()),
        });
    }

    let result = value
        .get("result")
        .ok_or_else(|| ExecutorError::Protocol("response has neither result nor error".into()))?;

    if let Some(state) = result.pointer("/status/state").and_then(Value::as_str) {
        if matches!(state, "failed" | "rejected" | "canceled") {
            let detail = result
                .pointer("/status/message/parts")
                .and_then(first_text)
                .unwrap_or_else(|| format!("task {state}"));
            return Err(ExecutorError::Remote(detail));
        }
    }

    let artifact_texts = || {
        result
            .get("artifacts")
            .and_then(Value::as_array)
            .and_then(|arts| arts.iter().find_map(|a| a.get("parts").and_then(first_text)))
    };

    result
        .get("parts")
        .and_then(first_text)
        .or_else(|| result.pointer("/status/message/parts").and_then(first_text))
        .or_else(artifact_texts)
        .ok_or_else(|| ExecutorError::Protocol("response contains no text part".into()))
}

fn first_text(parts: &Value) -> Option<String> {
    parts.as_array()?.iter().find_map(|part| {
        let text = part.get("text")?.as_str()?.trim();
        (!text.is_empty()).then(|| text.to_string())
    })
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    if trimmed.chars().count() <= BODY_PREVIEW_LIMIT {
        return trimmed.to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    out.push_str("...");
    out
}

/// Self-description served by an A2A worker at `/.well-known/agent.json`.
#[derive(Debug, Clone, Deserialize)]
pub struct AgentCard {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub skills: Vec<WorkerSkill>,
}

impl AgentCard {
    /// Endpoint for this card, reached at the address it was discovered from.
    ///
    /// The card's own `url` is only logged: agents often advertise a bind
    /// address (`0.0.0.0`) or an internal hostname.
    pub fn into_endpoint(self, base_url: &str) -> WorkerEndpoint {
        if let Some(advertised) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            if advertised.trim_end_matches('/') != base_url.trim_end_matches('/') {
                debug!(
                    worker = %self.name,
                    advertised,
                    using = base_url,
                    "agent card advertises a different url; using the discovery url"
                );
            }
        }
        WorkerEndpoint {
            name: self.name,
            url: base_url.to_string(),
            description: self.description,
            skills: self.skills,
        }
    }
}

/// Fetch the agent card of the worker at `base_url`.
pub async fn fetch_agent_card(client: &reqwest::Client, base_url: &str) -> Result<AgentCard> {
    let card_url = format!("{}{AGENT_CARD_PATH}", base_url.trim_end_matches('/'));
    let card = client
        .get(&card_url)
        .send()
        .await?
        .error_for_status()?
        .json::<AgentCard>()
        .await?;
    Ok(card)
}

/// Resolve every URL's agent card into a worker endpoint.
///
/// Unreachable workers and malformed cards are logged and skipped.
pub async fn discover_workers(client: &reqwest::Client, urls: &[String]) -> Vec<WorkerEndpoint> {
    let mut workers = Vec::with_capacity(urls.len());

    for url in urls {
        match fetch_agent_card(client, url).await {
            Ok(card) => {
                info!(url = %url, worker = %card.name, skills = card.skills.len(), "discovered worker");
                workers.push(card.into_endpoint(url));
            }
            Err(err) => {
                warn!(url = %url, error = %err, "failed to fetch agent card; skipping");
            }
        }
    }

    workers
}
