use anyhow::{Context, Result};
use clap::Parser;
use dracin_config::{ConfigLoader, DracinConfig, LogLevel};
use std::path::Path;
use tracing::{debug, info, warn};

mod cli;
mod commands;
use cli::{Cli, Commands, ConfigCommands};

/// Load configuration from a file, falling back to environment and defaults
fn load_config(config_path: Option<&Path>) -> Result<DracinConfig> {
    let path = match config_path {
        Some(path) if path.exists() => {
            info!("Loading configuration from: {:?}", path);
            Some(path)
        }
        Some(path) => {
            warn!("Configuration file not found: {:?}. Using defaults.", path);
            None
        }
        None => {
            debug!("No configuration file specified. Loading from environment or defaults.");
            None
        }
    };

    ConfigLoader::new().load(path).with_context(|| match path {
        Some(path) => format!("Failed to load configuration from {:?}", path),
        None => "Failed to load configuration from environment".to_string(),
    })
}

/// Initialize logging from the configuration, with `--log-level` taking precedence
fn init_logging(config: &DracinConfig, log_level: Option<&str>) -> Result<()> {
    let mut logging_config = config.logging.clone();
    if let Some(level_str) = log_level {
        match level_str.parse::<LogLevel>() {
            Ok(level) => logging_config.level = level,
            Err(e) => eprintln!("{}, keeping '{}'", e, logging_config.level),
        }
    }

    if let Err(e) = dracin_logging::init_logging_from_config(&logging_config) {
        eprintln!(
            "Failed to initialize structured logging: {}, falling back to simple tracing",
            e
        );
        dracin_logging::init_simple_tracing(logging_config.level.as_str())?;
    }

    debug!("Logging initialized");
    Ok(())
}

/// Load configuration and initialize logging from it
fn setup(config_path: Option<&Path>, log_level: Option<&str>) -> Result<DracinConfig> {
    let config = load_config(config_path)?;
    init_logging(&config, log_level)?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let log_level = cli.log_level.as_deref();

    match cli.command {
        Some(Commands::Run(args)) => {
            let config = setup(config_path, log_level)?;
            commands::handle_run(config, &args).await
        }
        Some(Commands::List) => commands::handle_list(&setup(config_path, log_level)?),
        Some(Commands::Profiles) => commands::handle_profiles(&setup(config_path, log_level)?),
        Some(Commands::Sample {
            count,
            seed,
            archetype,
        }) => {
            let config = setup(config_path, log_level)?;
            commands::handle_sample(&config, count, seed, archetype.as_deref())
        }
        Some(Commands::Config { config_cmd }) => match config_cmd {
            // A broken file is reported by the command itself, so logging
            // cannot depend on loading it
            ConfigCommands::Validate { config_file } => {
                dracin_logging::init_simple_tracing(log_level.unwrap_or("info"))?;
                let path = config_file
                    .as_deref()
                    .or(config_path)
                    .context("No configuration file given; use --config-file or --config")?;
                commands::handle_config_validate(path)
            }
            ConfigCommands::Generate { output, force } => {
                dracin_logging::init_simple_tracing(log_level.unwrap_or("info"))?;
                commands::handle_config_generate(&output, force)
            }
            ConfigCommands::Show { format } => {
                let config = setup(config_path, log_level)?;
                commands::handle_config_show(&config, &format)
            }
        },
        None => {
            // If no subcommand is provided, print help
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            cmd.print_help().context("Failed to print help")?;
            println!();
            Ok(())
        }
    }
}
