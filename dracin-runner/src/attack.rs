//! Attack assembly and execution

use crate::client::{run_task, run_weighted, TaskContext};
use crate::errors::{RunnerError, RunnerResult};
use crate::metrics::summarize;
use dracin_scenarios::{Archetype, LoadPlan, LoadShape, RunSummary, Threshold, ThresholdVerdict};
use goose::config::GooseConfiguration;
use goose::prelude::*;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Outcome of an attack: what happened and how it was judged
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub verdicts: Vec<ThresholdVerdict>,
}

impl RunReport {
    pub fn new(summary: RunSummary, thresholds: &[Threshold]) -> Self {
        let verdicts = thresholds
            .iter()
            .map(|threshold| threshold.evaluate(&summary))
            .collect();
        Self { summary, verdicts }
    }

    /// True when every threshold held; a run without thresholds passes
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(|verdict| verdict.passed)
    }

    pub fn failed(&self) -> impl Iterator<Item = &ThresholdVerdict> {
        self.verdicts.iter().filter(|verdict| !verdict.passed)
    }
}

/// Register every archetype of `plan` with a fresh goose attack
pub fn build_attack(plan: &LoadPlan) -> RunnerResult<GooseAttack> {
    if plan.archetypes.is_empty() {
        return Err(RunnerError::EmptyPlan);
    }

    let ctx = Arc::new(TaskContext::from_plan(plan));
    let mut attack = GooseAttack::initialize_with_config(GooseConfiguration::default())?;
    for archetype in &plan.archetypes {
        debug!(
            "Registering {} (weight {}, wait {}, {} tasks)",
            archetype.name(),
            archetype.weight,
            archetype.wait,
            archetype.tasks.len()
        );
        attack = attack.register_scenario(scenario_for(archetype, &ctx)?);
    }

    attack = *attack.set_default(GooseDefault::Host, plan.host.as_str())?;
    attack = *attack.set_default(GooseDefault::NoResetMetrics, true)?;

    attack = match &plan.shape {
        LoadShape::Steady {
            users,
            hatch_rate,
            run_time,
        } => {
            let attack = *attack.set_default(GooseDefault::Users, *users)?;
            let attack = *attack.set_default(GooseDefault::HatchRate, hatch_rate.as_str())?;
            *attack.set_default(GooseDefault::RunTime, run_time.as_secs() as usize)?
        }
        LoadShape::Profile { profile, scale } => {
            let test_plan = profile.test_plan(*scale);
            debug!("Profile {} test plan: {}", profile.name, test_plan);
            *attack.set_default(GooseDefault::TestPlan, test_plan.as_str())?
        }
    };

    if let Some(ref report_file) = plan.report_file {
        attack = *attack.set_default(GooseDefault::ReportFile, report_file.as_str())?;
    }

    Ok(attack)
}

/// One goose scenario per archetype. A sequential archetype registers its
/// steps as sequenced transactions; a weighted one registers a single
/// transaction that draws a task by weight on every run, since goose would
/// otherwise cycle through a fixed order.
fn scenario_for(archetype: &Archetype, ctx: &Arc<TaskContext>) -> RunnerResult<Scenario> {
    let mut scenario = Scenario::new(archetype.name())
        .set_weight(archetype.weight)?
        .set_wait_time(archetype.wait.min, archetype.wait.max)?;

    if !archetype.sequential {
        let ctx = Arc::clone(ctx);
        let shared = Arc::new(archetype.clone());
        let transaction = Transaction::new(Arc::new(move |user| {
            Box::pin(run_weighted(Arc::clone(&ctx), Arc::clone(&shared), user))
        }))
        .set_name(archetype.kind.key());
        return Ok(scenario.register_transaction(transaction));
    }

    for (index, task) in archetype.tasks.iter().enumerate() {
        let ctx = Arc::clone(ctx);
        let kind = task.kind;
        let transaction = Transaction::new(Arc::new(move |user| {
            Box::pin(run_task(Arc::clone(&ctx), kind, user))
        }))
        .set_name(kind.label())
        .set_sequence(index + 1);
        scenario = scenario.register_transaction(transaction);
    }

    Ok(scenario)
}

/// Execute the attack described by `plan` and judge it against its thresholds
pub async fn run(plan: &LoadPlan) -> RunnerResult<RunReport> {
    let attack = build_attack(plan)?;

    info!(
        "Starting attack on {}: {} archetypes, up to {} users for {:?}",
        plan.host,
        plan.archetypes.len(),
        plan.shape.peak_users(),
        plan.shape.duration()
    );

    let metrics = attack.execute().await?;
    let summary = summarize(&metrics);
    let report = RunReport::new(summary, &plan.thresholds);

    info!(
        "Attack finished: {} requests, {} failed",
        report.summary.total_requests(),
        report.summary.total_failures()
    );
    for verdict in report.failed() {
        warn!("Threshold failed: {}", verdict);
    }

    Ok(report)
}
