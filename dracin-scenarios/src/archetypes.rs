//! Simulated user archetypes
//!
//! An archetype is a weighted population slice: a wait range between
//! actions and a list of weighted, tagged tasks. Browse, auth and VIP users
//! pick their next task at random by weight; the journey, signup and watch
//! users walk their steps in order.

use crate::error::ScenarioError;
use crate::request::RequestPlan;
use crate::tasks::{TaskKind, UserSession, MAX_WATCHED_EPISODES};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Category labels used to select a subset of tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Browse,
    Search,
    Health,
    Vip,
    Auth,
    Referral,
    Journey,
    Signup,
    Watch,
}

impl Tag {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tag::Browse => "browse",
            Tag::Search => "search",
            Tag::Health => "health",
            Tag::Vip => "vip",
            Tag::Auth => "auth",
            Tag::Referral => "referral",
            Tag::Journey => "journey",
            Tag::Signup => "signup",
            Tag::Watch => "watch",
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tag {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "browse" => Ok(Tag::Browse),
            "search" => Ok(Tag::Search),
            "health" => Ok(Tag::Health),
            "vip" => Ok(Tag::Vip),
            "auth" => Ok(Tag::Auth),
            "referral" => Ok(Tag::Referral),
            "journey" => Ok(Tag::Journey),
            "signup" => Ok(Tag::Signup),
            "watch" => Ok(Tag::Watch),
            _ => Err(ScenarioError::UnknownTag(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchetypeKind {
    Browse,
    Auth,
    Vip,
    Journey,
    Signup,
    Watch,
}

impl ArchetypeKind {
    pub const ALL: [ArchetypeKind; 6] = [
        ArchetypeKind::Browse,
        ArchetypeKind::Auth,
        ArchetypeKind::Vip,
        ArchetypeKind::Journey,
        ArchetypeKind::Signup,
        ArchetypeKind::Watch,
    ];

    /// Key used in configuration
    pub fn key(&self) -> &'static str {
        match self {
            ArchetypeKind::Browse => "browse",
            ArchetypeKind::Auth => "auth",
            ArchetypeKind::Vip => "vip",
            ArchetypeKind::Journey => "journey",
            ArchetypeKind::Signup => "signup",
            ArchetypeKind::Watch => "watch",
        }
    }

    /// Scenario name the engine reports
    pub fn scenario_name(&self) -> &'static str {
        match self {
            ArchetypeKind::Browse => "BrowseUser",
            ArchetypeKind::Auth => "AuthUser",
            ArchetypeKind::Vip => "VipUser",
            ArchetypeKind::Journey => "JourneyUser",
            ArchetypeKind::Signup => "SignupUser",
            ArchetypeKind::Watch => "WatchUser",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ArchetypeKind::Browse => "Casual browser",
            ArchetypeKind::Auth => "Login attempts",
            ArchetypeKind::Vip => "VIP access patterns",
            ArchetypeKind::Journey => "Landing, trending, search, detail, episodes, stream",
            ArchetypeKind::Signup => "Referral visit, register, login, profile",
            ArchetypeKind::Watch => "Browse a source, list episodes, watch up to three",
        }
    }
}

impl fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for ArchetypeKind {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| {
                kind.key().eq_ignore_ascii_case(wanted)
                    || kind.scenario_name().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| ScenarioError::UnknownArchetype(s.to_string()))
    }
}

/// Random pause between two actions of one user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WaitRange {
    pub min: Duration,
    pub max: Duration,
}

impl WaitRange {
    pub const fn between_millis(min: u64, max: u64) -> Self {
        Self {
            min: Duration::from_millis(min),
            max: Duration::from_millis(max),
        }
    }
}

impl fmt::Display for WaitRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1}s..{:.1}s",
            self.min.as_secs_f64(),
            self.max.as_secs_f64()
        )
    }
}

/// One weighted, tagged action of an archetype
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskDef {
    pub kind: TaskKind,
    pub weight: usize,
    pub tags: Vec<Tag>,
}

impl TaskDef {
    fn new(kind: TaskKind, weight: usize, tags: &[Tag]) -> Self {
        Self {
            kind,
            weight,
            tags: tags.to_vec(),
        }
    }

    pub fn has_any_tag(&self, tags: &[Tag]) -> bool {
        self.tags.iter().any(|tag| tags.contains(tag))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Archetype {
    pub kind: ArchetypeKind,
    pub weight: usize,
    pub wait: WaitRange,
    pub tasks: Vec<TaskDef>,
    /// Tasks run in declaration order instead of by weight
    pub sequential: bool,
}

impl Archetype {
    /// The built-in definition of an archetype
    pub fn builtin(kind: ArchetypeKind) -> Self {
        use Tag::*;
        use TaskKind as T;

        match kind {
            ArchetypeKind::Browse => Self {
                kind,
                weight: 5,
                wait: WaitRange::between_millis(1_000, 3_000),
                tasks: vec![
                    TaskDef::new(T::DramaboxTrending, 3, &[Browse]),
                    TaskDef::new(T::ReelshortHomepage, 3, &[Browse]),
                    TaskDef::new(T::DramawaveHome, 2, &[Browse]),
                    TaskDef::new(T::SourceTheaters, 2, &[Browse]),
                    TaskDef::new(T::Search, 2, &[Search]),
                    TaskDef::new(T::Health, 1, &[Health]),
                    TaskDef::new(T::VipPlans, 1, &[Vip]),
                ],
                sequential: false,
            },
            ArchetypeKind::Auth => Self {
                kind,
                weight: 2,
                wait: WaitRange::between_millis(100, 500),
                tasks: vec![
                    TaskDef::new(T::Login, 3, &[Auth]),
                    TaskDef::new(T::CheckUsername, 1, &[Auth]),
                ],
                sequential: false,
            },
            ArchetypeKind::Vip => Self {
                kind,
                weight: 1,
                wait: WaitRange::between_millis(500, 2_000),
                tasks: vec![
                    TaskDef::new(T::VipPlans, 2, &[Vip]),
                    TaskDef::new(T::ReferralSettings, 1, &[Referral]),
                    TaskDef::new(T::ReferralLookup, 1, &[Referral]),
                ],
                sequential: false,
            },
            ArchetypeKind::Journey => Self {
                kind,
                weight: 1,
                wait: WaitRange::between_millis(1_000, 3_000),
                tasks: [
                    T::JourneyLanding,
                    T::JourneyTrending,
                    T::JourneySearch,
                    T::JourneyDetail,
                    T::JourneyEpisodes,
                    T::JourneyStream,
                ]
                .into_iter()
                .map(|kind| TaskDef::new(kind, 1, &[Journey]))
                .collect(),
                sequential: true,
            },
            ArchetypeKind::Signup => Self {
                kind,
                weight: 1,
                wait: WaitRange::between_millis(500, 3_000),
                tasks: [
                    T::SignupVisit,
                    T::SignupLookup,
                    T::SignupCheckUsername,
                    T::SignupRegister,
                    T::SignupLogin,
                    T::SignupProfile,
                    T::SignupReferralStatus,
                ]
                .into_iter()
                .map(|kind| TaskDef::new(kind, 1, &[Signup]))
                .collect(),
                sequential: true,
            },
            ArchetypeKind::Watch => Self {
                kind,
                weight: 1,
                wait: WaitRange::between_millis(3_000, 10_000),
                tasks: [T::WatchBrowse, T::WatchEpisodes]
                    .into_iter()
                    .chain((1..=MAX_WATCHED_EPISODES).map(T::WatchStream))
                    .map(|kind| TaskDef::new(kind, 1, &[Watch]))
                    .collect(),
                sequential: true,
            },
        }
    }

    /// All built-in archetypes, the opt-in flows included
    pub fn all() -> Vec<Self> {
        ArchetypeKind::ALL.into_iter().map(Self::builtin).collect()
    }

    pub fn name(&self) -> &'static str {
        self.kind.scenario_name()
    }

    /// Keep only tasks carrying one of `tags`. No tags keeps everything;
    /// an archetype left without tasks is dropped.
    pub fn retain_tags(mut self, tags: &[Tag]) -> Option<Self> {
        if tags.is_empty() {
            return Some(self);
        }
        self.tasks.retain(|task| task.has_any_tag(tags));
        if self.tasks.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    pub fn total_task_weight(&self) -> usize {
        self.tasks.iter().map(|task| task.weight).sum()
    }

    /// Pick a task by weight
    pub fn pick_task<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&TaskDef> {
        weighted_pick(rng, &self.tasks, |task| task.weight)
    }
}

/// A request drawn from a population, with the archetype that drew it
#[derive(Debug, Clone, Serialize)]
pub struct SampledRequest {
    pub archetype: ArchetypeKind,
    pub task: TaskKind,
    pub request: RequestPlan,
}

/// The enabled archetypes, picked by weight
#[derive(Debug, Clone)]
pub struct Population {
    archetypes: Vec<Archetype>,
}

impl Population {
    pub fn new(archetypes: Vec<Archetype>) -> Self {
        Self { archetypes }
    }

    pub fn archetypes(&self) -> &[Archetype] {
        &self.archetypes
    }

    pub fn pick_archetype<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Archetype> {
        weighted_pick(rng, &self.archetypes, |archetype| archetype.weight)
    }

    /// Draw `count` requests the way the attack issues them: each round picks
    /// an archetype by weight; a weighted archetype sends one task picked by
    /// weight, a sequential one walks its applicable steps in order. No
    /// responses exist in a dry run, so steps that read one see nothing.
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R, count: usize) -> Vec<SampledRequest> {
        let mut drawn = Vec::with_capacity(count);
        while drawn.len() < count {
            let Some(archetype) = self.pick_archetype(rng) else {
                break;
            };

            if !archetype.sequential {
                if let Some(task) = archetype.pick_task(rng) {
                    let request = task.kind.plan(rng, &mut UserSession::default());
                    drawn.push(SampledRequest::new(archetype.kind, task.kind, request));
                }
                continue;
            }

            let mut session = UserSession::default();
            for task in &archetype.tasks {
                if drawn.len() == count {
                    break;
                }
                if !task.kind.applies_to(&session) {
                    continue;
                }
                let request = task.kind.plan(rng, &mut session);
                session.absorb(task.kind, rng, None);
                drawn.push(SampledRequest::new(archetype.kind, task.kind, request));
            }
        }
        drawn
    }
}

impl SampledRequest {
    fn new(archetype: ArchetypeKind, task: TaskKind, request: RequestPlan) -> Self {
        Self {
            archetype,
            task,
            request,
        }
    }
}

fn weighted_pick<'a, T, R, F>(rng: &mut R, items: &'a [T], weight: F) -> Option<&'a T>
where
    R: Rng + ?Sized,
    F: Fn(&T) -> usize,
{
    let total: usize = items.iter().map(&weight).sum();
    if total == 0 {
        return None;
    }

    let mut roll = rng.random_range(0..total);
    for item in items {
        let w = weight(item);
        if roll < w {
            return Some(item);
        }
        roll -= w;
    }
    None
}
