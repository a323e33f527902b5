//! Load shape configuration

use crate::error::ConfigResult;
use crate::validation::{validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// How many simulated users to run and for how long.
///
/// With `profile` unset the attack is steady: `users` are launched at
/// `hatch_rate` per second and the test stops after `run_time`. With a
/// profile the named stage plan drives the user count instead, scaled by
/// `scale`, and the steady fields are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadConfig {
    /// Number of concurrent simulated users in steady mode
    #[serde(default = "default_users")]
    pub users: usize,

    /// Users launched per second in steady mode (may be fractional)
    #[serde(default = "default_hatch_rate")]
    pub hatch_rate: String,

    /// Steady mode duration
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_run_time"
    )]
    pub run_time: Duration,

    /// Named stage profile (load, spike, stress, soak, burst, journey, signup, watch)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Multiplier applied to every profile stage target
    #[serde(default = "default_scale")]
    pub scale: f64,

    /// Optional HTML/JSON/Markdown report written by the engine
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_file: Option<String>,
}

impl LoadConfig {
    /// Hatch rate as a number of users per second
    pub fn hatch_rate_per_sec(&self) -> Option<f64> {
        self.hatch_rate.trim().parse::<f64>().ok()
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            users: default_users(),
            hatch_rate: default_hatch_rate(),
            run_time: default_run_time(),
            profile: None,
            scale: default_scale(),
            report_file: None,
        }
    }
}

impl Validatable for LoadConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_positive(self.users, "users", self.domain_name())?;
        validate_positive(self.run_time.as_secs(), "run_time", self.domain_name())?;

        match self.hatch_rate_per_sec() {
            Some(rate) if rate.is_finite() && rate > 0.0 => {}
            _ => {
                return Err(self.validation_error(format!(
                    "hatch_rate must be a positive number, got '{}'",
                    self.hatch_rate
                )))
            }
        }

        if !self.scale.is_finite() {
            return Err(self.validation_error("scale must be a finite number"));
        }
        validate_positive(self.scale, "scale", self.domain_name())?;

        if let Some(ref profile) = self.profile {
            validate_required_string(profile, "profile", self.domain_name())?;
        }

        if let Some(ref report_file) = self.report_file {
            validate_required_string(report_file, "report_file", self.domain_name())?;
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "load"
    }
}

// Default value functions
fn default_users() -> usize {
    8
}

fn default_hatch_rate() -> String {
    "1".to_string()
}

fn default_run_time() -> Duration {
    Duration::from_secs(60)
}

fn default_scale() -> f64 {
    1.0
}
