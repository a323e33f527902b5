//! Subcommand handlers

pub mod catalog;
pub mod config;
pub mod run;

pub use catalog::{handle_list, handle_profiles, handle_sample};
pub use config::{handle_config_generate, handle_config_show, handle_config_validate};
pub use run::handle_run;
