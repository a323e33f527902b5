//! The `run` command

use crate::cli::RunArgs;
use anyhow::{anyhow, Context, Result};
use colored::Colorize;
use dracin_config::DracinConfig;
use dracin_runner::RunReport;
use dracin_scenarios::{LoadPlan, LoadShape, ThresholdVerdict};
use std::time::Duration;
use tracing::info;

impl RunArgs {
    /// Apply the flags to `config`. Any steady-mode flag switches a
    /// configured profile off.
    pub fn apply(&self, config: &mut DracinConfig) {
        if let Some(ref host) = self.host {
            config.target.host = host.clone();
        }

        let steady = self.users.is_some() || self.hatch_rate.is_some() || self.run_time.is_some();
        if steady {
            config.load.profile = None;
        }
        if let Some(users) = self.users {
            config.load.users = users;
        }
        if let Some(ref hatch_rate) = self.hatch_rate {
            config.load.hatch_rate = hatch_rate.clone();
        }
        if let Some(run_time) = self.run_time {
            config.load.run_time = Duration::from_secs(run_time);
        }

        if let Some(ref profile) = self.profile {
            config.load.profile = Some(profile.clone());
        }
        if let Some(scale) = self.scale {
            config.load.scale = scale;
        }
        if let Some(ref archetypes) = self.archetypes {
            config.scenarios.archetypes = archetypes.clone();
        }
        if let Some(ref tags) = self.tags {
            config.scenarios.tags = tags.clone();
        }
        if let Some(ref report_file) = self.report_file {
            config.load.report_file = Some(report_file.clone());
        }
    }
}

pub async fn handle_run(mut config: DracinConfig, args: &RunArgs) -> Result<()> {
    args.apply(&mut config);
    config
        .validate_all()
        .context("Invalid configuration after applying command-line overrides")?;

    let plan = LoadPlan::from_config(&config).context("Failed to resolve load plan")?;
    print_plan(&plan);

    let report = dracin_runner::run(&plan)
        .await
        .context("Load test failed to run")?;
    print_report(&report);

    if let Some(ref report_file) = plan.report_file {
        info!("HTML report written to {}", report_file);
    }

    let failed = report.failed().count();
    if failed > 0 {
        return Err(anyhow!(
            "{} of {} thresholds failed",
            failed,
            report.verdicts.len()
        ));
    }

    Ok(())
}

fn print_plan(plan: &LoadPlan) {
    println!("{} {}", "Target:".bold(), plan.host);
    let names: Vec<_> = plan.archetypes.iter().map(|a| a.name()).collect();
    println!("{} {}", "Archetypes:".bold(), names.join(", "));
    match &plan.shape {
        LoadShape::Steady {
            users,
            hatch_rate,
            run_time,
        } => println!(
            "{} {} users, hatch rate {}/s, {}s",
            "Load:".bold(),
            users,
            hatch_rate,
            run_time.as_secs()
        ),
        LoadShape::Profile { profile, scale } => println!(
            "{} profile {} x{} ({})",
            "Load:".bold(),
            profile.name,
            scale,
            profile.test_plan(*scale)
        ),
    }
    println!();
}

fn print_report(report: &RunReport) {
    let summary = &report.summary;
    println!();
    println!(
        "{:<6} {:<28} {:>9} {:>7} {:>9} {:>9} {:>9}",
        "Method", "Name", "Requests", "Fails", "Avg ms", "p95 ms", "Max ms"
    );
    for endpoint in &summary.endpoints {
        println!(
            "{:<6} {:<28} {:>9} {:>7} {:>9} {:>9} {:>9}",
            endpoint.method,
            endpoint.name,
            endpoint.total(),
            endpoint.failures,
            format_ms(endpoint.latency.mean()),
            format_ms(endpoint.latency.percentile(95.0).map(|ms| ms as f64)),
            format_ms(endpoint.latency.max().map(|ms| ms as f64)),
        );
    }

    let error_rate = summary
        .error_rate()
        .map(|rate| format!("{:.2}%", rate * 100.0))
        .unwrap_or_else(|| "-".to_string());
    println!(
        "\n{} requests in {}s ({:.1} req/s), error rate {}",
        summary.total_requests(),
        summary.duration_secs,
        summary.requests_per_second(),
        error_rate
    );

    if report.verdicts.is_empty() {
        return;
    }
    println!("\n{}", "Thresholds".bold());
    for verdict in &report.verdicts {
        println!("  {}", colored_verdict(verdict));
    }
}

fn colored_verdict(verdict: &ThresholdVerdict) -> String {
    let line = verdict.to_string();
    if verdict.passed {
        format!("{} {}", "✓".green().bold(), line.green())
    } else {
        format!("{} {}", "✗".red().bold(), line.red())
    }
}

fn format_ms(value: Option<f64>) -> String {
    value
        .map(|ms| format!("{:.0}", ms))
        .unwrap_or_else(|| "-".to_string())
}
