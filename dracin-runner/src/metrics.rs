//! Conversion of goose metrics into an engine-independent summary

use dracin_scenarios::{EndpointStats, RunSummary};
use goose::metrics::GooseMetrics;
use std::collections::BTreeMap;

pub fn summarize(metrics: &GooseMetrics) -> RunSummary {
    let endpoints = metrics
        .requests
        .values()
        .map(|aggregate| {
            endpoint_stats(
                &format!("{:?}", aggregate.method).to_uppercase(),
                &aggregate.path,
                &aggregate.raw_data.times,
                aggregate.success_count,
                aggregate.fail_count,
            )
        })
        .collect();

    RunSummary::new(metrics.duration as u64, endpoints)
}

/// `times` maps a response time in milliseconds to how often it was seen
fn endpoint_stats(
    method: &str,
    name: &str,
    times: &BTreeMap<usize, usize>,
    successes: usize,
    failures: usize,
) -> EndpointStats {
    let mut stats = EndpointStats::new(method, name);
    stats.successes = successes as u64;
    stats.failures = failures as u64;
    for (&millis, &count) in times {
        stats.latency.record_n(millis as u64, count as u64);
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_stats_from_timings() {
        let times = BTreeMap::from([(12, 3), (40, 1), (900, 1)]);
        let stats = endpoint_stats("GET", "/api/[source]/search", &times, 4, 1);

        assert_eq!(stats.method, "GET");
        assert_eq!(stats.name, "/api/[source]/search");
        assert_eq!(stats.total(), 5);
        assert_eq!(stats.latency.count(), 5);
        assert_eq!(stats.latency.max(), Some(900));
        assert_eq!(stats.latency.percentile(50.0), Some(12));
        assert_eq!(stats.error_rate(), Some(0.2));
    }

    #[test]
    fn test_endpoint_stats_without_timings() {
        let stats = endpoint_stats("POST", "/api/auth/login", &BTreeMap::new(), 0, 0);
        assert_eq!(stats.total(), 0);
        assert_eq!(stats.latency.percentile(95.0), None);
    }
}
