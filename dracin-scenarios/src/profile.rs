//! Staged load profiles
//!
//! A stage ramps the user count linearly to `target` over `duration`,
//! starting from the previous stage's target. The engine receives the
//! stages as a test plan string: `users,duration;users,duration;...`.

use crate::error::{ScenarioError, ScenarioResult};
use crate::thresholds::Threshold;
use serde::Serialize;
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stage {
    pub duration: Duration,
    pub target: usize,
}

impl Stage {
    pub const fn secs(duration: u64, target: usize) -> Self {
        Self {
            duration: Duration::from_secs(duration),
            target,
        }
    }

    pub const fn mins(duration: u64, target: usize) -> Self {
        Self::secs(duration * 60, target)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadProfile {
    pub name: &'static str,
    pub description: &'static str,
    pub stages: Vec<Stage>,
    /// Applied when the configuration names no thresholds
    pub thresholds: Vec<Threshold>,
}

impl LoadProfile {
    pub const NAMES: [&'static str; 8] = [
        "load", "spike", "stress", "soak", "burst", "journey", "signup", "watch",
    ];

    /// Look up a built-in profile by name
    pub fn builtin(name: &str) -> ScenarioResult<Self> {
        let profile = match name.trim().to_lowercase().as_str() {
            "load" => Self {
                name: "load",
                description: "Ramp through 500, 2000 and 5000 users, then drain",
                stages: vec![
                    Stage::mins(1, 500),
                    Stage::mins(2, 2_000),
                    Stage::mins(3, 5_000),
                    Stage::mins(1, 1_000),
                    Stage::secs(30, 0),
                ],
                thresholds: vec![Threshold::percentile(95.0, 3_000), Threshold::error_rate(0.1)],
            },
            "spike" => Self {
                name: "spike",
                description: "Jump to 5000 users within ten seconds and hold",
                stages: vec![
                    Stage::secs(10, 5_000),
                    Stage::secs(50, 5_000),
                    Stage::secs(10, 0),
                ],
                thresholds: vec![
                    Threshold::percentile(95.0, 10_000),
                    Threshold::error_rate(0.3),
                ],
            },
            "stress" => Self {
                name: "stress",
                description: "Climb to 15000 users to find the breaking point",
                stages: vec![
                    Stage::mins(1, 5_000),
                    Stage::mins(2, 8_000),
                    Stage::mins(2, 10_000),
                    Stage::mins(2, 15_000),
                    Stage::mins(1, 0),
                ],
                thresholds: vec![Threshold::error_rate(0.3)],
            },
            "soak" => Self {
                name: "soak",
                description: "Hold 2000 users for two hours",
                stages: vec![
                    Stage::mins(2, 2_000),
                    Stage::mins(116, 2_000),
                    Stage::mins(2, 0),
                ],
                thresholds: vec![
                    Threshold::percentile(99.0, 10_000),
                    Threshold::error_rate(0.1),
                ],
            },
            "burst" => Self {
                name: "burst",
                description: "10000 users at once for one minute",
                stages: vec![
                    Stage::secs(1, 10_000),
                    Stage::secs(60, 10_000),
                    Stage::secs(1, 0),
                ],
                thresholds: vec![Threshold::error_rate(0.5)],
            },
            "journey" => Self {
                name: "journey",
                description: "Gentle ramp to 500 users sized for full user journeys",
                stages: vec![
                    Stage::secs(30, 50),
                    Stage::mins(1, 200),
                    Stage::mins(2, 500),
                    Stage::mins(1, 200),
                    Stage::secs(30, 0),
                ],
                thresholds: vec![
                    Threshold::percentile(95.0, 5_000),
                    Threshold::error_rate(0.15),
                ],
            },
            "signup" => Self {
                name: "signup",
                description: "Ramp to 200 users registering through a referral link",
                stages: vec![
                    Stage::secs(30, 20),
                    Stage::mins(1, 100),
                    Stage::mins(2, 200),
                    Stage::secs(30, 0),
                ],
                thresholds: vec![
                    Threshold::percentile(95.0, 5_000),
                    Threshold::error_rate(0.3),
                ],
            },
            "watch" => Self {
                name: "watch",
                description: "Ramp to 300 users watching episodes back to back",
                stages: vec![
                    Stage::secs(30, 30),
                    Stage::mins(2, 150),
                    Stage::mins(3, 300),
                    Stage::mins(1, 100),
                    Stage::secs(30, 0),
                ],
                thresholds: vec![
                    Threshold::percentile(95.0, 8_000),
                    Threshold::error_rate(0.2),
                ],
            },
            _ => return Err(ScenarioError::UnknownProfile(name.to_string())),
        };
        Ok(profile)
    }

    pub fn all() -> Vec<Self> {
        Self::NAMES
            .iter()
            .filter_map(|name| Self::builtin(name).ok())
            .collect()
    }

    /// Stages with every non-zero target multiplied by `scale`
    pub fn scaled_stages(&self, scale: f64) -> Vec<Stage> {
        self.stages
            .iter()
            .map(|stage| Stage {
                duration: stage.duration,
                target: scale_target(stage.target, scale),
            })
            .collect()
    }

    /// Test plan string understood by the engine
    pub fn test_plan(&self, scale: f64) -> String {
        self.scaled_stages(scale)
            .iter()
            .map(|stage| format!("{},{}s", stage.target, stage.duration.as_secs()))
            .collect::<Vec<_>>()
            .join(";")
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|stage| stage.duration).sum()
    }

    pub fn peak_users(&self, scale: f64) -> usize {
        self.scaled_stages(scale)
            .iter()
            .map(|stage| stage.target)
            .max()
            .unwrap_or(0)
    }
}

impl fmt::Display for LoadProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.description)
    }
}

/// Round to the nearest user; a non-zero stage never scales down to zero
fn scale_target(target: usize, scale: f64) -> usize {
    if target == 0 {
        return 0;
    }
    ((target as f64 * scale).round() as usize).max(1)
}
