//! Domain-driven configuration for the DRACIN load tests
//!
//! Configuration is split by functional domain (target, load shape, scenario
//! selection, thresholds, logging). Each domain carries its own defaults and
//! validation, and every value can be overridden from `DRACIN_*` environment
//! variables.

pub mod error;
pub mod loader;
pub mod validation;

// Domain-specific configuration modules
pub mod domains;

// Re-export main types
pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use validation::Validatable;

// Re-export domain configurations
pub use domains::{
    load::LoadConfig,
    logging::{LogFormat, LogLevel, LoggingConfig},
    scenarios::ScenarioConfig,
    target::TargetConfig,
    DracinConfig,
};

// Re-export utilities
pub use domains::utils::serde_duration;
