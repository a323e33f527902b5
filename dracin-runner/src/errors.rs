//! Runner error types

use dracin_scenarios::ScenarioError;
use goose::GooseError;

pub type RunnerResult<T> = Result<T, RunnerError>;

/// Error type for building or executing an attack
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("Load engine error: {0}")]
    Goose(#[from] GooseError),

    #[error("Scenario error: {0}")]
    Scenario(#[from] ScenarioError),

    #[error("Load plan has no archetypes to run")]
    EmptyPlan,
}
