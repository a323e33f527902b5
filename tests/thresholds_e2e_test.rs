//! Thresholds judge the run; failures reported by the target fail them

mod common;

use anyhow::Result;
use common::{fast_plan, StubServer};
use dracin_config::DracinConfig;
use dracin_scenarios::Threshold;
use std::time::Duration;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_failing_endpoint_fails_error_rate_threshold() -> Result<()> {
    let server = StubServer::spawn(&["/api/health"]).await?;

    let mut config = DracinConfig::default();
    config.scenarios.archetypes = vec!["browse".to_string()];
    config.scenarios.tags = vec!["health".to_string()];
    config.load.users = 2;
    config.load.hatch_rate = "2".to_string();
    config.load.run_time = Duration::from_secs(2);
    config.thresholds = vec!["rate<0.1".to_string(), "p(99)<5000".to_string()];
    let plan = fast_plan(&mut config, &server)?;

    let report = dracin_runner::run(&plan).await?;
    let summary = &report.summary;

    // only the health task survives the tag filter
    assert_eq!(summary.endpoints.len(), 1);
    assert_eq!(summary.endpoints[0].name, "/api/health");
    assert!(summary.total_requests() > 0);
    assert_eq!(summary.total_failures(), summary.total_requests());
    assert_eq!(summary.error_rate(), Some(1.0));

    assert!(!report.passed());
    let failed: Vec<_> = report.failed().map(|v| v.threshold).collect();
    assert_eq!(failed, vec![Threshold::error_rate(0.1)]);

    Ok(())
}
