//! User archetypes and request construction for the DRACIN load tests
//!
//! This crate holds the declarative side of the load test: which endpoints a
//! simulated user hits, how often, with which random parameters, and how the
//! run is judged afterwards. It has no knowledge of the load engine; the
//! `dracin-runner` crate hands these definitions to goose.

pub mod archetypes;
pub mod catalog;
pub mod error;
pub mod plan;
pub mod profile;
pub mod report;
pub mod request;
pub mod tasks;
pub mod thresholds;

// Re-export commonly used types at the crate root
pub use archetypes::{Archetype, ArchetypeKind, Population, Tag, TaskDef, WaitRange};
pub use error::{ScenarioError, ScenarioResult};
pub use plan::{LoadPlan, LoadShape};
pub use profile::{LoadProfile, Stage};
pub use report::{EndpointStats, LatencyHistogram, RunSummary};
pub use request::{HttpMethod, RequestPlan};
pub use tasks::{extract_book_ids, SignupAccount, TaskKind, UserSession};
pub use thresholds::{Threshold, ThresholdVerdict};
