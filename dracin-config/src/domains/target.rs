//! Target host configuration

use crate::error::ConfigResult;
use crate::validation::{validate_http_url, validate_positive, validate_required_string, Validatable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Where the simulated users send their requests, and how
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Base URL of the backend under test
    #[serde(default = "default_host")]
    pub host: String,

    /// Per-request timeout
    #[serde(
        with = "crate::domains::utils::serde_duration",
        default = "default_timeout"
    )]
    pub timeout: Duration,

    /// Send the desktop browser header profile with every request
    #[serde(default = "crate::domains::utils::default_true")]
    pub browser_headers: bool,

    /// Extra headers sent with every request
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            timeout: default_timeout(),
            browser_headers: true,
            headers: BTreeMap::new(),
        }
    }
}

impl Validatable for TargetConfig {
    fn validate(&self) -> ConfigResult<()> {
        validate_http_url(&self.host, "host", self.domain_name())?;
        validate_positive(self.timeout.as_secs(), "timeout", self.domain_name())?;

        for (name, value) in &self.headers {
            validate_required_string(name, "header name", self.domain_name())?;
            if name.contains(char::is_whitespace) || name.contains(':') {
                return Err(self.validation_error(format!("invalid header name '{}'", name)));
            }
            if value.contains(['\r', '\n']) {
                return Err(self.validation_error(format!(
                    "header '{}' value must not contain line breaks",
                    name
                )));
            }
        }

        Ok(())
    }

    fn domain_name(&self) -> &'static str {
        "target"
    }
}

// Default value functions
fn default_host() -> String {
    "https://dracinshort.xyz".to_string()
}

fn default_timeout() -> Duration {
    Duration::from_secs(30)
}
