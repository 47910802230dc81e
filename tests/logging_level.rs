// tests/logging_level.rs

use agentdag::cli::LogLevel;
use std::path::{Path, PathBuf};

use agentdag::logging::{resolve_level, split_log_path};
use tracing::Level;

#[test]
fn cli_flag_beats_environment() {
    assert_eq!(resolve_level(Some(LogLevel::Trace), Some("error")), Level::TRACE);
}

#[test]
fn environment_is_used_without_a_flag() {
    assert_eq!(resolve_level(None, Some(" Debug ")), Level::DEBUG);
    assert_eq!(resolve_level(None, Some("warning")), Level::WARN);
}

#[test]
fn unknown_or_missing_values_default_to_info() {
    assert_eq!(resolve_level(None, Some("chatty")), Level::INFO);
    assert_eq!(resolve_level(None, None), Level::INFO);
}

#[test]
fn log_file_path_splits_into_directory_and_name() {
    let (dir, name) = split_log_path(Path::new("logs/app.log")).unwrap();
    assert_eq!(dir, PathBuf::from("logs"));
    assert_eq!(name, "app.log");
}

#[test]
fn bare_log_file_name_logs_into_the_working_directory() {
    let (dir, name) = split_log_path(Path::new("app.log")).unwrap();
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(name, "app.log");
}

#[test]
fn log_file_path_without_a_name_is_rejected() {
    assert!(split_log_path(Path::new("/")).is_err());
    assert!(split_log_path(Path::new("logs/..")).is_err());
}
