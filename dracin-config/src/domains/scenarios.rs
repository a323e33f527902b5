//! Scenario selection configuration

use crate::error::ConfigResult;
use crate::validation::{validate_required_string, Validatable};
use serde::{Deserialize, Serialize};

/// Which user archetypes run, and which tagged tasks they keep
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    /// Enabled archetypes by name
    #[serde(default = "default_archetypes")]
    pub archetypes: Vec<String>,

    /// Only keep tasks carrying one of these tags; empty keeps everything
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            archetypes: default_archetypes(),
            tags: Vec::new(),
        }
    }
}

impl Validatable for ScenarioConfig {
    fn validate(&self) -> ConfigResult<()> {
        if self.archetypes.is_empty() {
            return Err(self.validation_error("At least one archetype must be enabled"));
        }

        for name in &self.archetypes {
            validate_required_string(name, "archetype", self.domain_name())?;
        }

        for tag in &self.tags {
            validate_required_string(tag, "tag", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "scenarios"
    }
}

fn default_archetypes() -> Vec<String> {
    vec!["browse".to_string(), "auth".to_string(), "vip".to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scenario_config_defaults() {
        let config = ScenarioConfig::default();
        assert_eq!(config.archetypes, vec!["browse", "auth", "vip"]);
        assert!(config.tags.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_scenario_config_validation() {
        let mut config = ScenarioConfig::default();
        config.archetypes.clear();
        assert!(config.validate().is_err());

        let mut config = ScenarioConfig::default();
        config.tags.push(String::new());
        assert!(config.validate().is_err());
    }
}
