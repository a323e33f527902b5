//! The `config` subcommands

use anyhow::{anyhow, Context, Result};
use dracin_config::DracinConfig;
use dracin_scenarios::LoadPlan;
use std::fs;
use std::path::Path;
use tracing::{error, info};

/// Annotated sample configuration written by `config generate`
pub const SAMPLE_CONFIG: &str = include_str!("../../../sample/configs/dracin.yaml");

/// Validate the file and that its names resolve to a runnable plan
pub fn handle_config_validate(config_file: &Path) -> Result<()> {
    info!("Validating configuration file: {:?}", config_file);

    if !config_file.exists() {
        return Err(anyhow!("Configuration file not found: {:?}", config_file));
    }

    let result = crate::load_config(Some(config_file)).and_then(|config| {
        LoadPlan::from_config(&config).context("Configuration does not resolve to a load plan")
    });

    match result {
        Ok(plan) => {
            println!("✅ Configuration file is valid");
            info!(
                "Configuration validation passed: {} archetypes, {} thresholds",
                plan.archetypes.len(),
                plan.thresholds.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("❌ Configuration validation failed: {:#}", e);
            error!("Configuration validation failed: {:#}", e);
            Err(e)
        }
    }
}

pub fn handle_config_generate(output: &Path, force: bool) -> Result<()> {
    info!("Generating configuration at: {:?}", output);

    if output.exists() && !force {
        return Err(anyhow!(
            "Output file already exists: {:?}. Use --force to overwrite.",
            output
        ));
    }

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context("Failed to create output directory")?;
        }
    }

    fs::write(output, SAMPLE_CONFIG).context("Failed to write configuration file")?;

    println!("✅ Configuration generated at: {:?}", output);
    println!(
        "🔧 Validate with: dracin-load config validate --config-file {:?}",
        output
    );

    Ok(())
}

pub fn handle_config_show(config: &DracinConfig, format: &str) -> Result<()> {
    let output = render_config(config, format)?;
    println!("{}", output);
    Ok(())
}

fn render_config(config: &DracinConfig, format: &str) -> Result<String> {
    match format.to_lowercase().as_str() {
        "yaml" | "yml" => serde_yaml::to_string(config).context("Failed to serialize to YAML"),
        "json" => serde_json::to_string_pretty(config).context("Failed to serialize to JSON"),
        _ => Err(anyhow!(
            "Unknown output format: {}. Valid formats: yaml, json",
            format
        )),
    }
}
