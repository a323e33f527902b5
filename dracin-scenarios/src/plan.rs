//! Configuration resolved into an executable load plan

use crate::archetypes::{Archetype, ArchetypeKind, Population, Tag};
use crate::catalog::browser_headers;
use crate::error::{ScenarioError, ScenarioResult};
use crate::profile::LoadProfile;
use crate::thresholds::Threshold;
use dracin_config::DracinConfig;
use std::time::Duration;
use tracing::debug;

/// How the user count evolves over the run
#[derive(Debug, Clone, PartialEq)]
pub enum LoadShape {
    /// Fixed user count started at `hatch_rate` users per second
    Steady {
        users: usize,
        hatch_rate: String,
        run_time: Duration,
    },
    /// Staged ramp from a built-in profile
    Profile { profile: LoadProfile, scale: f64 },
}

impl LoadShape {
    /// Expected wall-clock length of the run
    pub fn duration(&self) -> Duration {
        match self {
            LoadShape::Steady { run_time, .. } => *run_time,
            LoadShape::Profile { profile, .. } => profile.total_duration(),
        }
    }

    pub fn peak_users(&self) -> usize {
        match self {
            LoadShape::Steady { users, .. } => *users,
            LoadShape::Profile { profile, scale } => profile.peak_users(*scale),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadPlan {
    pub host: String,
    pub timeout: Duration,
    /// Sent with every request, in order
    pub headers: Vec<(String, String)>,
    pub archetypes: Vec<Archetype>,
    pub shape: LoadShape,
    pub thresholds: Vec<Threshold>,
    pub report_file: Option<String>,
}

impl LoadPlan {
    pub fn from_config(config: &DracinConfig) -> ScenarioResult<Self> {
        let tags = config
            .scenarios
            .tags
            .iter()
            .map(|tag| tag.parse::<Tag>())
            .collect::<ScenarioResult<Vec<_>>>()?;

        let mut kinds: Vec<ArchetypeKind> = Vec::new();
        for name in &config.scenarios.archetypes {
            let kind: ArchetypeKind = name.parse()?;
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }

        let archetypes: Vec<Archetype> = kinds
            .into_iter()
            .filter_map(|kind| {
                let kept = Archetype::builtin(kind).retain_tags(&tags);
                if kept.is_none() {
                    debug!("Archetype {} has no tasks tagged {:?}, dropping", kind, tags);
                }
                kept
            })
            .collect();

        if archetypes.is_empty() {
            return Err(ScenarioError::NoTasksSelected(config.scenarios.tags.join(", ")));
        }

        let shape = match config.load.profile.as_deref() {
            Some(name) => LoadShape::Profile {
                profile: LoadProfile::builtin(name)?,
                scale: config.load.scale,
            },
            None => LoadShape::Steady {
                users: config.load.users,
                hatch_rate: config.load.hatch_rate.trim().to_string(),
                run_time: config.load.run_time,
            },
        };

        let thresholds = if config.thresholds.is_empty() {
            match &shape {
                LoadShape::Profile { profile, .. } => profile.thresholds.clone(),
                LoadShape::Steady { .. } => Vec::new(),
            }
        } else {
            Threshold::parse_all(&config.thresholds)?
        };

        let host = config.target.host.trim_end_matches('/').to_string();
        let mut headers = if config.target.browser_headers {
            browser_headers(&host)
        } else {
            Vec::new()
        };
        for (name, value) in &config.target.headers {
            headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
            headers.push((name.clone(), value.clone()));
        }

        Ok(Self {
            host,
            timeout: config.target.timeout,
            headers,
            archetypes,
            shape,
            thresholds,
            report_file: config.load.report_file.clone(),
        })
    }

    pub fn population(&self) -> Population {
        Population::new(self.archetypes.clone())
    }
}
