//! Read-only views of the catalog: `list`, `profiles` and `sample`

use anyhow::{Context, Result};
use colored::Colorize;
use dracin_config::DracinConfig;
use dracin_scenarios::{Archetype, ArchetypeKind, LoadPlan, LoadProfile, Population, Tag};
use rand::rngs::StdRng;
use rand::SeedableRng;

pub fn handle_list(config: &DracinConfig) -> Result<()> {
    for archetype in Archetype::all() {
        let enabled = config
            .scenarios
            .archetypes
            .iter()
            .any(|name| name.parse::<ArchetypeKind>().ok() == Some(archetype.kind));
        let marker = if enabled {
            "enabled".green()
        } else {
            "disabled".dimmed()
        };

        println!(
            "{} [{}] weight {}, wait {}{} ({})",
            archetype.name().bold(),
            marker,
            archetype.weight,
            archetype.wait,
            if archetype.sequential { ", in order" } else { "" },
            archetype.kind.description()
        );
        for task in &archetype.tasks {
            let tags: Vec<_> = task.tags.iter().map(Tag::as_str).collect();
            println!(
                "    {:<20} weight {:<2} [{}]",
                task.kind.label(),
                task.weight,
                tags.join(", ")
            );
        }
    }
    Ok(())
}

pub fn handle_profiles(config: &DracinConfig) -> Result<()> {
    let scale = config.load.scale;
    for profile in LoadProfile::all() {
        println!("{} {}", profile.name.bold(), profile.description);
        let stages: Vec<_> = profile
            .scaled_stages(scale)
            .iter()
            .map(|stage| format!("{}s -> {}", stage.duration.as_secs(), stage.target))
            .collect();
        println!("    stages:     {}", stages.join(", "));
        println!("    test plan:  {}", profile.test_plan(scale));
        println!(
            "    duration:   {}s, peak {} users",
            profile.total_duration().as_secs(),
            profile.peak_users(scale)
        );
        let thresholds: Vec<_> = profile.thresholds.iter().map(|t| t.to_string()).collect();
        println!("    thresholds: {}", thresholds.join(", "));
    }
    Ok(())
}

/// Population a dry run draws from: the configured one, or a single archetype
pub fn sample_population(config: &DracinConfig, archetype: Option<&str>) -> Result<Population> {
    let plan = LoadPlan::from_config(config).context("Failed to resolve load plan")?;

    match archetype {
        Some(name) => {
            let kind: ArchetypeKind = name.parse()?;
            let tags = config
                .scenarios
                .tags
                .iter()
                .map(|tag| tag.parse::<Tag>())
                .collect::<Result<Vec<_>, _>>()?;
            let archetype = Archetype::builtin(kind)
                .retain_tags(&tags)
                .with_context(|| format!("{} has no tasks matching the configured tags", kind))?;
            Ok(Population::new(vec![archetype]))
        }
        None => Ok(plan.population()),
    }
}

pub fn handle_sample(
    config: &DracinConfig,
    count: usize,
    seed: Option<u64>,
    archetype: Option<&str>,
) -> Result<()> {
    let population = sample_population(config, archetype)?;
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    for sampled in population.draw(&mut rng, count) {
        println!(
            "{:<12} {:<20} {}",
            sampled.archetype.scenario_name(),
            sampled.task.label(),
            sampled.request
        );
    }
    Ok(())
}
