//! Configuration loading and environment variable handling

use crate::domains::utils::split_list;
use crate::domains::DracinConfig;
use crate::error::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Configuration loader with environment variable support
pub struct ConfigLoader {
    /// Environment variable prefix
    prefix: String,
}

impl ConfigLoader {
    /// Create a new config loader with default prefix
    pub fn new() -> Self {
        Self {
            prefix: "DRACIN".to_string(),
        }
    }

    /// Create a new config loader with custom prefix
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Load configuration from a YAML file with environment overrides
    pub fn from_file(&self, path: impl AsRef<Path>) -> ConfigResult<DracinConfig> {
        let path = path.as_ref();
        debug!("Reading configuration from {:?}", path);
        let content = std::fs::read_to_string(path)?;
        self.from_yaml_str(&content)
    }

    /// Load configuration from YAML text with environment overrides
    pub fn from_yaml_str(&self, content: &str) -> ConfigResult<DracinConfig> {
        // An empty document deserializes to unit, not to the defaults
        let mut config: DracinConfig = if content.trim().is_empty() {
            DracinConfig::default()
        } else {
            serde_yaml::from_str(content)?
        };

        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env(&self) -> ConfigResult<DracinConfig> {
        let mut config = DracinConfig::default();
        self.apply_env_overrides(&mut config)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Load configuration with fallback chain
    pub fn load(&self, config_path: Option<impl AsRef<Path>>) -> ConfigResult<DracinConfig> {
        match config_path {
            Some(path) => self.from_file(path),
            None => self.from_env(),
        }
    }

    /// Apply environment variable overrides to configuration
    fn apply_env_overrides(&self, config: &mut DracinConfig) -> ConfigResult<()> {
        self.apply_target_overrides(&mut config.target)?;
        self.apply_load_overrides(&mut config.load)?;
        self.apply_scenario_overrides(&mut config.scenarios);
        self.apply_logging_overrides(&mut config.logging)?;

        if let Ok(thresholds) = self.get_env_var("THRESHOLDS") {
            config.thresholds = split_list(&thresholds);
        }

        Ok(())
    }

    /// Apply target config overrides
    fn apply_target_overrides(
        &self,
        config: &mut crate::domains::target::TargetConfig,
    ) -> ConfigResult<()> {
        if let Ok(host) = self.get_env_var("TARGET_HOST") {
            config.host = host;
        }

        if let Ok(timeout) = self.get_env_var("HTTP_TIMEOUT") {
            let seconds: u64 = self.parse_env("HTTP_TIMEOUT", &timeout)?;
            config.timeout = Duration::from_secs(seconds);
        }

        if let Ok(browser_headers) = self.get_env_var("BROWSER_HEADERS") {
            config.browser_headers = self.parse_env("BROWSER_HEADERS", &browser_headers)?;
        }

        Ok(())
    }

    /// Apply load config overrides
    fn apply_load_overrides(
        &self,
        config: &mut crate::domains::load::LoadConfig,
    ) -> ConfigResult<()> {
        if let Ok(users) = self.get_env_var("USERS") {
            config.users = self.parse_env("USERS", &users)?;
        }

        if let Ok(hatch_rate) = self.get_env_var("HATCH_RATE") {
            config.hatch_rate = hatch_rate;
        }

        if let Ok(run_time) = self.get_env_var("RUN_TIME") {
            let seconds: u64 = self.parse_env("RUN_TIME", &run_time)?;
            config.run_time = Duration::from_secs(seconds);
        }

        if let Ok(profile) = self.get_env_var("PROFILE") {
            config.profile = Some(profile).filter(|p| !p.trim().is_empty());
        }

        if let Ok(scale) = self.get_env_var("SCALE") {
            config.scale = self.parse_env("SCALE", &scale)?;
        }

        if let Ok(report_file) = self.get_env_var("REPORT_FILE") {
            config.report_file = Some(report_file);
        }

        Ok(())
    }

    /// Apply scenario config overrides
    fn apply_scenario_overrides(&self, config: &mut crate::domains::scenarios::ScenarioConfig) {
        if let Ok(archetypes) = self.get_env_var("ARCHETYPES") {
            config.archetypes = split_list(&archetypes);
        }

        if let Ok(tags) = self.get_env_var("TAGS") {
            config.tags = split_list(&tags);
        }
    }

    /// Apply logging config overrides
    fn apply_logging_overrides(
        &self,
        config: &mut crate::domains::logging::LoggingConfig,
    ) -> ConfigResult<()> {
        if let Ok(log_level) = self.get_env_var("LOG_LEVEL") {
            config.level = crate::domains::logging::LogLevel::from_str(&log_level)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_LEVEL: {}", log_level)))?;
        }

        if let Ok(format) = self.get_env_var("LOG_FORMAT") {
            config.format = crate::domains::logging::LogFormat::from_str(&format)
                .map_err(|_| ConfigError::EnvError(format!("Invalid LOG_FORMAT: {}", format)))?;
        }

        if let Ok(file) = self.get_env_var("LOG_FILE") {
            config.file = Some(file);
        }

        Ok(())
    }

    fn parse_env<T>(&self, name: &str, value: &str) -> ConfigResult<T>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        value
            .trim()
            .parse()
            .map_err(|e| ConfigError::EnvError(format!("Invalid {}_{}: {}", self.prefix, name, e)))
    }

    /// Get environment variable with prefix
    fn get_env_var(&self, name: &str) -> Result<String, std::env::VarError> {
        std::env::var(format!("{}_{}", self.prefix, name))
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
