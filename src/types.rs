// src/types.rs

use serde::Deserialize;

/// Task identifier assigned by the plan producer. Doubles as the task's order.
pub type TaskId = u32;

/// How the final plan outcome is rendered on stdout.
///
/// - `Text`: a human-readable execution summary (default).
/// - `Json`: the full `PlanOutcome` as pretty-printed JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
