// src/main.rs

use agentdag::{cli, exit_code, logging, run};

#[tokio::main]
async fn main() {
    let code = match run_main().await {
        Ok(Some(status)) => exit_code(status),
        Ok(None) => 0,
        Err(err) => {
            eprintln!("agentdag error: {err:?}");
            1
        }
    };
    std::process::exit(code);
}

async fn run_main() -> anyhow::Result<Option<agentdag::engine::PlanStatus>> {
    let args = cli::parse();
    // Dropped when this returns, flushing the log file before exit.
    let _log_guard = logging::init_logging(args.log_level, args.log_file.as_deref())?;
    run(args).await
}
