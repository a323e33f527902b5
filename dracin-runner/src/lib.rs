//! Goose bridge for the DRACIN load tests
//!
//! Registers every enabled archetype as a goose scenario, issues the
//! requests each task plans, and converts goose's metrics into a
//! [`RunSummary`](dracin_scenarios::RunSummary) that thresholds are judged
//! against.

pub mod attack;
pub mod client;
pub mod errors;
pub mod metrics;

// Re-export main types for convenience
pub use attack::{build_attack, run, RunReport};
pub use client::{issue, run_task, run_weighted, TaskContext};
pub use errors::{RunnerError, RunnerResult};
pub use metrics::summarize;
