//! Domain-specific configuration modules

pub mod load;
pub mod logging;
pub mod scenarios;
pub mod target;
pub mod utils;

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Main configuration combining all domains
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DracinConfig {
    /// Backend under test
    #[serde(default)]
    pub target: target::TargetConfig,

    /// Load shape
    #[serde(default)]
    pub load: load::LoadConfig,

    /// Archetype and tag selection
    #[serde(default)]
    pub scenarios: scenarios::ScenarioConfig,

    /// Pass/fail rules such as `p(95)<3000` or `rate<0.1`; empty uses the
    /// selected profile's defaults
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub thresholds: Vec<String>,

    /// Logging configuration
    #[serde(default)]
    pub logging: logging::LoggingConfig,
}

impl DracinConfig {
    /// Validate all domain configurations
    pub fn validate_all(&self) -> ConfigResult<()> {
        self.target.validate()?;
        self.load.validate()?;
        self.scenarios.validate()?;
        self.logging.validate()?;

        for rule in &self.thresholds {
            validate_required_string(rule, "threshold", "thresholds")?;
        }

        Ok(())
    }
}
