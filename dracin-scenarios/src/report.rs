//! Engine-independent summary of a finished run

use serde::Serialize;
use std::collections::BTreeMap;

/// Response times bucketed by millisecond
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LatencyHistogram {
    buckets: BTreeMap<u64, u64>,
    count: u64,
    total_ms: u64,
    max_ms: u64,
}

impl LatencyHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, millis: u64) {
        self.record_n(millis, 1);
    }

    pub fn record_n(&mut self, millis: u64, n: u64) {
        if n == 0 {
            return;
        }
        *self.buckets.entry(millis).or_default() += n;
        self.count += n;
        self.total_ms += millis * n;
        self.max_ms = self.max_ms.max(millis);
    }

    pub fn merge(&mut self, other: &LatencyHistogram) {
        for (&millis, &n) in &other.buckets {
            self.record_n(millis, n);
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.total_ms as f64 / self.count as f64)
    }

    pub fn max(&self) -> Option<u64> {
        (self.count > 0).then_some(self.max_ms)
    }

    /// Nearest-rank percentile, `p` in (0, 100]
    pub fn percentile(&self, p: f64) -> Option<u64> {
        if self.count == 0 || !(p > 0.0 && p <= 100.0) {
            return None;
        }

        // multiply before dividing so whole-number ranks stay exact
        let rank = ((p * self.count as f64) / 100.0).ceil().max(1.0) as u64;
        let mut seen = 0;
        for (&millis, &n) in &self.buckets {
            seen += n;
            if seen >= rank {
                return Some(millis);
            }
        }
        Some(self.max_ms)
    }
}

/// Per-endpoint outcome, keyed by method and display name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStats {
    pub method: String,
    pub name: String,
    pub successes: u64,
    pub failures: u64,
    pub latency: LatencyHistogram,
}

impl EndpointStats {
    pub fn new(method: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            name: name.into(),
            successes: 0,
            failures: 0,
            latency: LatencyHistogram::new(),
        }
    }

    pub fn total(&self) -> u64 {
        self.successes + self.failures
    }

    pub fn error_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| self.failures as f64 / total as f64)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub duration_secs: u64,
    pub endpoints: Vec<EndpointStats>,
}

impl RunSummary {
    pub fn new(duration_secs: u64, mut endpoints: Vec<EndpointStats>) -> Self {
        endpoints.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.method.cmp(&b.method)));
        Self {
            duration_secs,
            endpoints,
        }
    }

    pub fn total_requests(&self) -> u64 {
        self.endpoints.iter().map(EndpointStats::total).sum()
    }

    pub fn total_failures(&self) -> u64 {
        self.endpoints.iter().map(|e| e.failures).sum()
    }

    /// Failed fraction of all requests; `None` when nothing was sent
    pub fn error_rate(&self) -> Option<f64> {
        let total = self.total_requests();
        (total > 0).then(|| self.total_failures() as f64 / total as f64)
    }

    /// All endpoints' response times merged
    pub fn latency(&self) -> LatencyHistogram {
        let mut merged = LatencyHistogram::new();
        for endpoint in &self.endpoints {
            merged.merge(&endpoint.latency);
        }
        merged
    }

    pub fn requests_per_second(&self) -> f64 {
        if self.duration_secs == 0 {
            return self.total_requests() as f64;
        }
        self.total_requests() as f64 / self.duration_secs as f64
    }

    pub fn endpoint(&self, name: &str) -> Option<&EndpointStats> {
        self.endpoints.iter().find(|e| e.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn histogram(values: &[u64]) -> LatencyHistogram {
        let mut h = LatencyHistogram::new();
        for &v in values {
            h.record(v);
        }
        h
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let h = histogram(&[10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
        assert_eq!(h.percentile(50.0), Some(50));
        assert_eq!(h.percentile(95.0), Some(100));
        assert_eq!(h.percentile(90.0), Some(90));
        assert_eq!(h.percentile(100.0), Some(100));
        assert_eq!(h.percentile(1.0), Some(10));
    }

    #[test]
    fn test_percentile_whole_ranks_over_one_to_hundred() {
        let values: Vec<u64> = (1..=100).collect();
        let h = histogram(&values);
        for p in 1..=100u64 {
            assert_eq!(h.percentile(p as f64), Some(p), "p({})", p);
        }
    }

    #[test]
    fn test_percentile_edge_cases() {
        assert_eq!(LatencyHistogram::new().percentile(95.0), None);

        let h = histogram(&[5]);
        assert_eq!(h.percentile(0.0), None);
        assert_eq!(h.percentile(101.0), None);
        assert_eq!(h.percentile(99.9), Some(5));
    }

    #[test]
    fn test_record_n_and_merge() {
        let mut a = LatencyHistogram::new();
        a.record_n(100, 9);
        a.record_n(2_000, 1);
        a.record_n(50, 0);
        assert_eq!(a.count(), 10);
        assert_eq!(a.mean(), Some(290.0));
        assert_eq!(a.max(), Some(2_000));

        let b = histogram(&[4_000]);
        a.merge(&b);
        assert_eq!(a.count(), 11);
        assert_eq!(a.max(), Some(4_000));
        assert_eq!(a.percentile(95.0), Some(4_000));
    }

    #[test]
    fn test_run_summary_aggregates() {
        let mut health = EndpointStats::new("GET", "/api/health");
        health.successes = 90;
        health.failures = 10;
        health.latency.record_n(20, 100);

        let mut login = EndpointStats::new("POST", "/api/auth/login");
        login.successes = 100;
        login.latency.record_n(200, 100);

        let summary = RunSummary::new(10, vec![health, login]);
        assert_eq!(summary.total_requests(), 200);
        assert_eq!(summary.total_failures(), 10);
        assert_eq!(summary.error_rate(), Some(0.05));
        assert_eq!(summary.requests_per_second(), 20.0);
        assert_eq!(summary.latency().count(), 200);
        // sorted by name
        assert_eq!(summary.endpoints[0].name, "/api/auth/login");
        assert_eq!(summary.endpoint("/api/health").unwrap().error_rate(), Some(0.1));
    }

    #[test]
    fn test_empty_summary() {
        let summary = RunSummary::default();
        assert_eq!(summary.total_requests(), 0);
        assert_eq!(summary.error_rate(), None);
        assert_eq!(summary.latency().percentile(95.0), None);
    }
}
