// tests/plan_loading.rs

use std::io::Write;

use tempfile::NamedTempFile;

use agentdag::errors::AgentdagError;
use agentdag::plan::{load_plan, parse_plan};

#[test]
fn planner_wire_names_are_accepted() {
    let plan = parse_plan(
        r#"{
            "tasks": [
                {
                    "agent_name": "Math Agent",
                    "task_description": "Multiply",
                    "task_input": "What is 3 * 4?",
                    "order": 1,
                    "dependencies": []
                },
                {
                    "agent_name": "Weather Agent",
                    "task_description": "Weather",
                    "task_input": "Weather in Paris?",
                    "order": 2
                }
            ],
            "summary": "Compute and check the weather"
        }"#,
    )
    .unwrap();

    assert_eq!(plan.summary, "Compute and check the weather");
    assert_eq!(plan.tasks.len(), 2);
    assert_eq!(plan.tasks[0].id, 1);
    assert_eq!(plan.tasks[0].worker_name, "Math Agent");
    assert_eq!(plan.tasks[0].input, "What is 3 * 4?");
    assert!(plan.tasks[1].dependencies.is_empty());
}

#[test]
fn plain_field_names_are_accepted_as_aliases() {
    let plan = parse_plan(
        r#"{"tasks": [{"id": 7, "worker_name": "W", "input": "go", "dependencies": [3]}]}"#,
    )
    .unwrap();

    assert_eq!(plan.tasks[0].id, 7);
    assert_eq!(plan.tasks[0].dependencies, vec![3]);
    assert_eq!(plan.tasks[0].description, "");
    assert_eq!(plan.summary, "");
}

#[test]
fn ready_response_yields_its_plan() {
    let plan = parse_plan(
        r#"{
            "status": "ready",
            "plan": {"tasks": [{"order": 1, "agent_name": "W", "task_input": "x"}], "summary": "s"}
        }"#,
    )
    .unwrap();
    assert_eq!(plan.tasks.len(), 1);
}

#[test]
fn planning_response_with_a_plan_counts_as_ready() {
    let plan = parse_plan(
        r#"{
            "status": "planning",
            "plan": {"tasks": [], "summary": "nothing yet"}
        }"#,
    )
    .unwrap();
    assert_eq!(plan.summary, "nothing yet");
}

#[test]
fn input_required_surfaces_the_question() {
    let err = parse_plan(r#"{"status": "input_required", "question": "Which city?"}"#).unwrap_err();
    match err {
        AgentdagError::PlanError(msg) => assert!(msg.contains("Which city?"), "{msg}"),
        other => panic!("Expected PlanError, got {other:?}"),
    }
}

#[test]
fn error_response_surfaces_the_error() {
    let err = parse_plan(r#"{"status": "error", "error": "model overloaded"}"#).unwrap_err();
    match err {
        AgentdagError::PlanError(msg) => assert!(msg.contains("model overloaded"), "{msg}"),
        other => panic!("Expected PlanError, got {other:?}"),
    }
}

#[test]
fn ready_without_plan_is_an_error() {
    let err = parse_plan(r#"{"status": "ready"}"#).unwrap_err();
    assert!(matches!(err, AgentdagError::PlanError(_)), "{err:?}");
}

#[test]
fn garbage_is_a_json_error() {
    let err = parse_plan("not json").unwrap_err();
    assert!(matches!(err, AgentdagError::JsonError(_)), "{err:?}");
}

#[test]
fn bare_plan_errors_name_the_missing_field() {
    let err = parse_plan(r#"{"tasks": [{"order": 1, "agent_name": "W"}], "summary": "s"}"#)
        .unwrap_err();
    match err {
        AgentdagError::JsonError(e) => assert!(e.to_string().contains("task_input"), "{e}"),
        other => panic!("Expected JsonError, got {other:?}"),
    }
}

#[test]
fn response_errors_name_the_bad_field() {
    let err = parse_plan(r#"{"status": "ready", "plan": {"tasks": "many"}}"#).unwrap_err();
    match err {
        AgentdagError::JsonError(e) => assert!(e.to_string().contains("sequence"), "{e}"),
        other => panic!("Expected JsonError, got {other:?}"),
    }
}

#[test]
fn unknown_status_is_a_json_error() {
    let err = parse_plan(r#"{"status": "thinking"}"#).unwrap_err();
    match err {
        AgentdagError::JsonError(e) => assert!(e.to_string().contains("thinking"), "{e}"),
        other => panic!("Expected JsonError, got {other:?}"),
    }
}

#[test]
fn plans_load_from_disk() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"tasks": [{{"order": 1, "agent_name": "W", "task_input": "x"}}], "summary": "disk"}}"#
    )
    .unwrap();

    let plan = load_plan(file.path()).unwrap();
    assert_eq!(plan.summary, "disk");
}
