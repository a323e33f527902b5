//! Scenario error types

use thiserror::Error;

pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors raised while resolving configuration into a load plan
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("Unknown archetype '{0}'. Valid archetypes: browse, auth, vip, journey, signup, watch")]
    UnknownArchetype(String),

    #[error("Unknown tag '{0}'. Valid tags: browse, search, health, vip, auth, referral, journey, signup, watch")]
    UnknownTag(String),

    #[error("Unknown load profile '{0}'. Valid profiles: load, spike, stress, soak, burst, journey, signup, watch")]
    UnknownProfile(String),

    #[error("Invalid threshold '{rule}': {reason}")]
    InvalidThreshold { rule: String, reason: String },

    #[error("No tasks left after filtering by tags [{0}]")]
    NoTasksSelected(String),
}
