// tests/http_executor.rs

use std::time::Duration;

use mockito::{Matcher, Server};
use serde_json::json;

use agentdag::build_registry;
use agentdag::engine::{Engine, EngineOptions, PlanStatus};
use agentdag::errors::ExecutorError;
use agentdag::exec::{
    A2aHttpExecutor, TaskExecutor, WorkerEndpoint, WorkerRegistry, discover_workers,
    parse_send_response,
};
use agentdag_test_utils::{ConfigFileBuilder, PlanBuilder, TaskBuilder, init_tracing};

fn executor() -> A2aHttpExecutor {
    A2aHttpExecutor::new(Duration::from_secs(5)).unwrap()
}

fn message_reply(text: &str) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": "1",
        "result": {
            "kind": "message",
            "role": "agent",
            "messageId": "m-1",
            "parts": [{"kind": "text", "text": text}]
        }
    })
    .to_string()
}

#[tokio::test]
async fn message_send_returns_first_text_part() {
    init_tracing();

    let mut server = Server::new_async().await;
    let m = server
        .mock("POST", "/")
        .match_body(Matcher::PartialJson(json!({
            "jsonrpc": "2.0",
            "method": "message/send",
            "params": {"message": {"role": "user", "parts": [{"kind": "text", "text": "What is 3 * 4?"}]}}
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(message_reply("  12  "))
        .create_async()
        .await;

    let worker = WorkerEndpoint::new("Math Agent", server.url());
    let text = executor().execute(&worker, "What is 3 * 4?").await.unwrap();

    assert_eq!(text, "12");
    m.assert_async().await;
}

#[tokio::test]
async fn non_success_status_is_reported_with_body() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/")
        .with_status(502)
        .with_body("bad gateway")
        .create_async()
        .await;

    let worker = WorkerEndpoint::new("Math Agent", server.url());
    let err = executor().execute(&worker, "hi").await.unwrap_err();

    assert_eq!(
        err,
        ExecutorError::Status {
            code: 502,
            body: "bad gateway".to_string()
        }
    );
}

#[tokio::test]
async fn json_rpc_error_is_a_remote_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"jsonrpc":"2.0","id":"1","error":{"code":-32603,"message":"agent crashed"}}"#)
        .create_async()
        .await;

    let worker = WorkerEndpoint::new("Math Agent", server.url());
    let err = executor().execute(&worker, "hi").await.unwrap_err();

    match err {
        ExecutorError::Remote(msg) => {
            assert!(msg.contains("agent crashed"));
            assert!(msg.contains("-32603"));
        }
        other => panic!("Expected Remote, got {other:?}"),
    }
}

#[tokio::test]
async fn unparseable_body_is_a_protocol_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", "/")
        .with_status(200)
        .with_body("<html>oops</html>")
        .create_async()
        .await;

    let worker = WorkerEndpoint::new("Math Agent", server.url());
    let err = executor().execute(&worker, "hi").await.unwrap_err();

    assert!(matches!(err, ExecutorError::Protocol(_)), "{err:?}");
}

#[tokio::test]
async fn unreachable_worker_is_a_transport_error() {
    // Nothing listens on port 9 on a test machine.
    let worker = WorkerEndpoint::new("Ghost", "http://127.0.0.1:9");
    let err = executor().execute(&worker, "hi").await.unwrap_err();

    assert!(matches!(err, ExecutorError::Transport(_)), "{err:?}");
}

#[test]
fn task_results_are_read_from_status_message_then_artifacts() {
    let from_status = json!({
        "result": {
            "kind": "task",
            "status": {"state": "completed", "message": {"parts": [{"kind": "text", "text": "sunny"}]}}
        }
    });
    assert_eq!(parse_send_response(&from_status).unwrap(), "sunny");

    let from_artifacts = json!({
        "result": {
            "kind": "task",
            "status": {"state": "completed"},
            "artifacts": [
                {"parts": [{"kind": "data", "data": {}}]},
                {"parts": [{"kind": "text", "text": "22 degrees"}]}
            ]
        }
    });
    assert_eq!(parse_send_response(&from_artifacts).unwrap(), "22 degrees");
}

#[test]
fn failed_task_state_is_a_remote_error() {
    let failed = json!({
        "result": {
            "kind": "task",
            "status": {"state": "failed", "message": {"parts": [{"kind": "text", "text": "no such city"}]}}
        }
    });
    assert_eq!(
        parse_send_response(&failed).unwrap_err(),
        ExecutorError::Remote("no such city".to_string())
    );
}

#[test]
fn response_without_text_is_a_protocol_error() {
    let empty = json!({"result": {"kind": "message", "parts": []}});
    assert!(matches!(
        parse_send_response(&empty),
        Err(ExecutorError::Protocol(_))
    ));
}

#[tokio::test]
async fn agent_cards_are_discovered_and_failures_skipped() {
    init_tracing();

    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/.well-known/agent.json")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "name": "Weather Agent",
                "description": "Forecasts",
                "version": "1.0.0",
                "skills": [{"id": "forecast", "name": "Forecast", "description": "Weather by city"}]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let urls = vec![server.url(), "http://127.0.0.1:9".to_string()];
    let workers = discover_workers(executor().client(), &urls).await;

    assert_eq!(workers.len(), 1);
    assert_eq!(workers[0].name, "Weather Agent");
    // The card has no url, so the discovery url is used.
    assert_eq!(workers[0].url, server.url());
    assert_eq!(workers[0].skills[0].name, "Forecast");
}

#[tokio::test]
async fn configured_workers_shadow_discovered_ones() {
    init_tracing();

    let mut server = Server::new_async().await;
    let _m = server
        .mock("GET", "/.well-known/agent.json")
        .with_status(200)
        .with_body(r#"{"name": "math agent", "url": "http://discovered.test"}"#)
        .create_async()
        .await;

    let cfg = ConfigFileBuilder::new()
        .with_worker("Math Agent", "http://static.test")
        .with_discovery_url(&server.url())
        .build();

    let registry = build_registry(&cfg, executor().client()).await.unwrap();

    assert_eq!(registry.len(), 1);
    assert_eq!(registry.resolve("MathAgent").unwrap().url, "http://static.test");
}

#[tokio::test]
async fn advertised_card_url_is_ignored_in_favour_of_the_discovery_url() {
    init_tracing();

    let mut server = Server::new_async().await;
    let _card = server
        .mock("GET", "/.well-known/agent.json")
        .with_status(200)
        .with_body(r#"{"name": "Math Agent", "url": "http://0.0.0.0:10004/"}"#)
        .create_async()
        .await;
    let send = server
        .mock("POST", "/")
        .match_body(Matcher::Regex("what is 2 \\+ 2".to_string()))
        .with_status(200)
        .with_body(message_reply("4"))
        .create_async()
        .await;

    let cfg = ConfigFileBuilder::new()
        .with_discovery_url(&server.url())
        .build();
    let registry = build_registry(&cfg, executor().client()).await.unwrap();
    assert_eq!(registry.resolve("Math Agent").unwrap().url, server.url());

    let engine = Engine::new(registry, executor(), EngineOptions::default());
    let plan = PlanBuilder::new("Add")
        .task(TaskBuilder::new(1, "Math Agent", "what is 2 + 2"))
        .build();

    let outcome = engine.run(&plan).await;

    send.assert_async().await;
    assert_eq!(outcome.status, PlanStatus::Completed);
    assert_eq!(outcome.results[&1].result.as_deref(), Some("4"));
}

#[tokio::test]
async fn engine_runs_a_plan_against_http_workers() {
    init_tracing();

    let mut server = Server::new_async().await;
    let _first = server
        .mock("POST", "/")
        .match_body(Matcher::Regex("convert 5 km".to_string()))
        .with_status(200)
        .with_body(message_reply("5000 m"))
        .create_async()
        .await;
    let second = server
        .mock("POST", "/")
        .match_body(Matcher::Regex(
            r"Previous result from task 1: 5000 m\\n\\nNow: add 10 m".to_string(),
        ))
        .with_status(200)
        .with_body(message_reply("5010 m"))
        .create_async()
        .await;

    let registry =
        WorkerRegistry::from_workers([WorkerEndpoint::new("Math Agent", server.url())]).unwrap();
    let engine = Engine::new(registry, executor(), EngineOptions::default());
    let plan = PlanBuilder::new("Unit maths")
        .task(TaskBuilder::new(1, "Math Agent", "convert 5 km"))
        .task(TaskBuilder::new(2, "Math Agent", "add 10 m").after(1))
        .build();

    let outcome = engine.run(&plan).await;

    assert_eq!(outcome.status, PlanStatus::Completed);
    assert_eq!(outcome.results[&1].result.as_deref(), Some("5000 m"));
    assert_eq!(outcome.results[&2].result.as_deref(), Some("5010 m"));
    second.assert_async().await;
}
