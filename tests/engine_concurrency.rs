// tests/engine_concurrency.rs

use std::time::Duration;

use agentdag::engine::{Engine, EngineOptions, PlanStatus};
use agentdag_test_utils::{
    Behaviour, PlanBuilder, ScriptedExecutor, TaskBuilder, init_tracing, registry_of, with_timeout,
};

fn wide_plan(width: u32) -> agentdag::plan::ExecutionPlan {
    let mut builder = PlanBuilder::new("Wide wave");
    for id in 1..=width {
        builder = builder.task(TaskBuilder::new(id, "Math Agent", &format!("job-{id}")));
    }
    builder.build()
}

fn slow_executor(width: u32) -> ScriptedExecutor {
    let mut exec = ScriptedExecutor::new();
    for id in 1..=width {
        exec = exec.on_delayed(
            &format!("job-{id}"),
            Duration::from_millis(20),
            Behaviour::Reply(format!("result {id}")),
        );
    }
    exec
}

#[tokio::test]
async fn fan_out_is_bounded_by_max_concurrency() {
    init_tracing();

    let exec = slow_executor(6);
    let options = EngineOptions {
        max_concurrency: 2,
        max_context_chars: 0,
    };
    let engine = Engine::new(registry_of(&["Math Agent"]), exec.clone(), options);

    let outcome = with_timeout(engine.run(&wide_plan(6))).await;

    assert_eq!(outcome.status, PlanStatus::Completed);
    assert_eq!(outcome.results.len(), 6);
    assert_eq!(exec.call_count(), 6);
    assert_eq!(exec.max_in_flight(), 2);
}

#[tokio::test]
async fn whole_wave_runs_concurrently_under_the_limit() {
    init_tracing();

    let exec = slow_executor(5);
    let engine = Engine::new(
        registry_of(&["Math Agent"]),
        exec.clone(),
        EngineOptions::default(),
    );

    let outcome = with_timeout(engine.run(&wide_plan(5))).await;

    assert_eq!(outcome.status, PlanStatus::Completed);
    assert_eq!(exec.max_in_flight(), 5);
}

#[tokio::test]
async fn slow_task_holds_back_the_next_wave() {
    init_tracing();

    let exec = ScriptedExecutor::new()
        .on_delayed(
            "slow root",
            Duration::from_millis(50),
            Behaviour::Reply("slow".to_string()),
        )
        .reply("fast root", "fast")
        .reply("child of fast", "child");
    let plan = PlanBuilder::new("Barrier")
        .task(TaskBuilder::new(1, "Math Agent", "slow root"))
        .task(TaskBuilder::new(2, "Math Agent", "fast root"))
        .task(TaskBuilder::new(3, "Math Agent", "child of fast").after(2))
        .build();

    let engine = Engine::new(
        registry_of(&["Math Agent"]),
        exec.clone(),
        EngineOptions::default(),
    );
    let outcome = with_timeout(engine.run(&plan)).await;

    assert_eq!(outcome.status, PlanStatus::Completed);

    // Task 3 only depends on task 2, but it belongs to wave 2 and must wait
    // for the whole of wave 1.
    let slow = exec.call_for("slow root").unwrap();
    let child = exec.call_for("child of fast").unwrap();
    assert!(child.started > slow.finished);
}
