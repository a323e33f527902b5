//! CLI argument parsing definitions

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dracin-load", author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Set the log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the load test against the target host
    Run(RunArgs),

    /// List user archetypes with their tasks
    List,

    /// List built-in load profiles
    Profiles,

    /// Print request plans without sending anything
    Sample {
        /// Number of requests to draw
        #[arg(long, value_name = "N", default_value_t = 20)]
        count: usize,

        /// Seed for a reproducible draw
        #[arg(long, value_name = "SEED")]
        seed: Option<u64>,

        /// Draw only from this archetype
        #[arg(long, value_name = "NAME")]
        archetype: Option<String>,
    },

    /// Configuration management commands
    Config {
        #[command(subcommand)]
        config_cmd: ConfigCommands,
    },
}

/// Overrides applied on top of the loaded configuration
#[derive(Args, Debug, Default, Clone)]
pub struct RunArgs {
    /// Target host, e.g. https://staging.dracinshort.xyz
    #[arg(long, value_name = "URL")]
    pub host: Option<String>,

    /// Number of concurrent users (steady mode)
    #[arg(long, value_name = "N", conflicts_with = "profile")]
    pub users: Option<usize>,

    /// Users started per second (steady mode)
    #[arg(long, value_name = "RATE", conflicts_with = "profile")]
    pub hatch_rate: Option<String>,

    /// Run time in seconds (steady mode)
    #[arg(long, value_name = "SECS", conflicts_with = "profile")]
    pub run_time: Option<u64>,

    /// Built-in load profile: load, spike, stress, soak, burst, journey, signup, watch
    #[arg(long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Multiply every profile stage target by this factor
    #[arg(long, value_name = "FACTOR")]
    pub scale: Option<f64>,

    /// Enabled archetypes, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub archetypes: Option<Vec<String>>,

    /// Only run tasks carrying one of these tags, comma separated
    #[arg(long, value_name = "LIST", value_delimiter = ',')]
    pub tags: Option<Vec<String>>,

    /// Write goose's HTML report to this file
    #[arg(long, value_name = "PATH")]
    pub report_file: Option<String>,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Validate a configuration file
    Validate {
        /// Path to the configuration file (defaults to --config)
        #[arg(long, value_name = "PATH")]
        config_file: Option<PathBuf>,
    },

    /// Generate a sample configuration file
    Generate {
        /// Output file path
        #[arg(long, value_name = "PATH")]
        output: PathBuf,

        /// Overwrite existing file
        #[arg(long)]
        force: bool,
    },

    /// Show current configuration in use
    Show {
        /// Output format: yaml, json
        #[arg(long, value_name = "FORMAT", default_value = "yaml")]
        format: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_overrides() {
        let cli = Cli::try_parse_from([
            "dracin-load",
            "--log-level",
            "debug",
            "run",
            "--host",
            "http://localhost:3000",
            "--users",
            "50",
            "--run-time",
            "120",
            "--archetypes",
            "browse,vip",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Some(Commands::Run(args)) => {
                assert_eq!(args.host.as_deref(), Some("http://localhost:3000"));
                assert_eq!(args.users, Some(50));
                assert_eq!(args.run_time, Some(120));
                assert_eq!(
                    args.archetypes,
                    Some(vec!["browse".to_string(), "vip".to_string()])
                );
                assert!(args.profile.is_none());
            }
            _ => panic!("expected run command"),
        }
    }

    #[test]
    fn test_profile_conflicts_with_steady_flags() {
        let result = Cli::try_parse_from([
            "dracin-load",
            "run",
            "--profile",
            "spike",
            "--users",
            "10",
        ]);
        assert!(result.is_err());

        let cli =
            Cli::try_parse_from(["dracin-load", "run", "--profile", "spike", "--scale", "0.1"])
                .unwrap();
        assert!(matches!(cli.command, Some(Commands::Run(ref args)) if args.scale == Some(0.1)));
    }

    #[test]
    fn test_parse_sample_defaults() {
        let cli = Cli::try_parse_from(["dracin-load", "sample", "--seed", "7"]).unwrap();
        match cli.command {
            Some(Commands::Sample {
                count,
                seed,
                archetype,
            }) => {
                assert_eq!(count, 20);
                assert_eq!(seed, Some(7));
                assert!(archetype.is_none());
            }
            _ => panic!("expected sample command"),
        }
    }

    #[test]
    fn test_global_config_after_subcommand() {
        let cli = Cli::try_parse_from([
            "dracin-load",
            "config",
            "show",
            "--format",
            "json",
            "--config",
            "dracin.yaml",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("dracin.yaml")));
    }
}
