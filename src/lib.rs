// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod plan;
pub mod present;
pub mod types;

use std::collections::BTreeSet;
use std::time::Duration;

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::config::ConfigFile;
use crate::config::loader::load_and_validate;
use crate::engine::{Engine, PlanStatus};
use crate::exec::{
    A2aHttpExecutor, WorkerEndpoint, WorkerRegistry, discover_workers, normalize_worker_name,
};
use crate::plan::{ExecutionPlan, PlanGraph, load_plan, preview_waves};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - worker registry (static workers plus agent-card discovery)
/// - plan loading
/// - the engine and the HTTP executor
/// - presentation of the outcome on stdout
///
/// Returns the plan status when a plan was evaluated (executed, or previewed
/// with `--dry-run` and found malformed), `None` otherwise.
pub async fn run(args: CliArgs) -> Result<Option<PlanStatus>> {
    let cfg = load_and_validate(&args.config)?;
    let timeout = Duration::from_secs(cfg.engine.request_timeout_secs);

    if args.dry_run {
        let plan = load_plan(required_plan_path(&args)?)?;
        return Ok(print_dry_run(&cfg, &plan));
    }

    let executor = A2aHttpExecutor::new(timeout)?;
    let registry = build_registry(&cfg, executor.client()).await?;

    if args.list_workers {
        print_workers(&registry);
        return Ok(None);
    }

    let plan = load_plan(required_plan_path(&args)?)?;
    info!(
        tasks = plan.tasks.len(),
        workers = registry.len(),
        "plan loaded"
    );

    let engine = Engine::new(registry, executor, cfg.engine_options());
    let outcome = engine.run(&plan).await;

    println!("{}", present::render(&outcome, args.format)?);
    Ok(Some(outcome.status))
}

/// Process exit code for a plan status.
pub fn exit_code(status: PlanStatus) -> i32 {
    match status {
        PlanStatus::Completed => 0,
        PlanStatus::PartialSuccess => 2,
        PlanStatus::StructuralError => 3,
    }
}

fn required_plan_path(args: &CliArgs) -> Result<&std::path::Path> {
    args.plan
        .as_deref()
        .ok_or_else(|| anyhow::anyhow!("--plan is required"))
}

/// Merge statically configured workers with the ones discovered from agent
/// cards.
///
/// A discovered worker whose name collides (after normalization) with a
/// static one, or with an earlier discovered one, is dropped.
pub async fn build_registry(
    cfg: &ConfigFile,
    client: &reqwest::Client,
) -> crate::errors::Result<WorkerRegistry> {
    let mut workers = cfg.worker_endpoints();
    let discovered = discover_workers(client, &cfg.discovery.urls).await;
    merge_discovered(&mut workers, discovered);
    WorkerRegistry::from_workers(workers)
}

fn merge_discovered(workers: &mut Vec<WorkerEndpoint>, discovered: Vec<WorkerEndpoint>) {
    let mut seen: BTreeSet<String> = workers
        .iter()
        .map(|w| normalize_worker_name(&w.name))
        .collect();

    for worker in discovered {
        let key = normalize_worker_name(&worker.name);
        if key.is_empty() {
            warn!(url = %worker.url, "discovered worker has an empty name; skipping");
            continue;
        }
        if !seen.insert(key) {
            warn!(
                worker = %worker.name,
                url = %worker.url,
                "discovered worker shadowed by an existing entry; skipping"
            );
            continue;
        }
        workers.push(worker);
    }
}

/// Validate the plan and print its waves; no worker is contacted.
fn print_dry_run(cfg: &ConfigFile, plan: &ExecutionPlan) -> Option<PlanStatus> {
    println!("agentdag dry-run");
    println!("  summary: {}", plan.summary);
    println!(
        "  engine.max_concurrency = {}",
        cfg.engine.max_concurrency
    );
    println!(
        "  engine.max_context_chars = {}",
        cfg.engine.max_context_chars
    );
    println!();

    let waves = PlanGraph::from_plan(plan).and_then(|graph| preview_waves(&graph));
    let waves = match waves {
        Ok(waves) => waves,
        Err(err) => {
            println!("plan is not executable: {err}");
            return Some(PlanStatus::StructuralError);
        }
    };

    let static_names: BTreeSet<String> = cfg
        .worker
        .keys()
        .map(|name| normalize_worker_name(name))
        .collect();

    println!("waves ({}):", waves.len());
    for (idx, wave) in waves.iter().enumerate() {
        println!("  wave {}:", idx + 1);
        for id in wave {
            let Some(task) = plan.task(*id) else {
                continue;
            };
            let marker = if static_names.contains(&normalize_worker_name(&task.worker_name)) {
                ""
            } else {
                " (worker not statically configured)"
            };
            println!("    - task {id} -> {}{marker}", task.worker_name);
            if !task.description.is_empty() {
                println!("        description: {}", task.description);
            }
            if !task.dependencies.is_empty() {
                println!("        dependencies: {:?}", task.dependencies);
            }
        }
    }

    debug!("dry-run complete (no execution)");
    None
}

fn print_workers(registry: &WorkerRegistry) {
    println!("workers ({}):", registry.len());
    for worker in registry.iter() {
        println!("  - {}", worker.name);
        println!("      url: {}", worker.url);
        if !worker.description.is_empty() {
            println!("      description: {}", worker.description);
        }
        for skill in &worker.skills {
            println!("      skill: {}", skill.name);
        }
    }
}
