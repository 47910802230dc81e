// tests/cli_args.rs

use std::path::PathBuf;

use clap::Parser;

use agentdag::cli::CliArgs;
use agentdag::config::default_config_path;
use agentdag::types::OutputFormat;

#[test]
fn config_defaults_to_the_loader_default() {
    let args = CliArgs::try_parse_from(["agentdag", "--plan", "plan.json"]).unwrap();

    assert_eq!(args.config, default_config_path());
    assert_eq!(args.config, PathBuf::from("Agentdag.toml"));
    assert_eq!(args.plan, Some(PathBuf::from("plan.json")));
    assert_eq!(args.format, OutputFormat::Text);
    assert!(!args.dry_run);
}

#[test]
fn plan_is_required_unless_listing_workers() {
    assert!(CliArgs::try_parse_from(["agentdag"]).is_err());

    let args = CliArgs::try_parse_from(["agentdag", "--list-workers"]).unwrap();
    assert!(args.list_workers);
    assert!(args.plan.is_none());
}

#[test]
fn json_format_and_log_file_are_accepted() {
    let args = CliArgs::try_parse_from([
        "agentdag",
        "--plan",
        "p.json",
        "--format",
        "json",
        "--log-file",
        "logs/agentdag.log",
    ])
    .unwrap();

    assert_eq!(args.format, OutputFormat::Json);
    assert_eq!(args.log_file, Some(PathBuf::from("logs/agentdag.log")));
}
