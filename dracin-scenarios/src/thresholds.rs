//! Pass/fail rules evaluated after a run
//!
//! Rules read `p(95)<3000`, `avg<500`, `max<8000`
//! (milliseconds) and `rate<0.1` (failed fraction). Comparisons are strict.

use crate::error::{ScenarioError, ScenarioResult};
use crate::report::RunSummary;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Threshold {
    Percentile { percentile: f64, max_ms: u64 },
    Average { max_ms: u64 },
    Maximum { max_ms: u64 },
    ErrorRate { max: f64 },
}

impl Threshold {
    pub fn percentile(percentile: f64, max_ms: u64) -> Self {
        Threshold::Percentile { percentile, max_ms }
    }

    pub fn error_rate(max: f64) -> Self {
        Threshold::ErrorRate { max }
    }

    /// Parse a list of rules, reporting the first invalid one
    pub fn parse_all<S: AsRef<str>>(rules: &[S]) -> ScenarioResult<Vec<Self>> {
        rules.iter().map(|rule| rule.as_ref().parse()).collect()
    }

    /// Observed value this rule compares against its limit
    pub fn observe(&self, summary: &RunSummary) -> Option<f64> {
        match self {
            Threshold::Percentile { percentile, .. } => summary
                .latency()
                .percentile(*percentile)
                .map(|ms| ms as f64),
            Threshold::Average { .. } => summary.latency().mean(),
            Threshold::Maximum { .. } => summary.latency().max().map(|ms| ms as f64),
            Threshold::ErrorRate { .. } => summary.error_rate(),
        }
    }

    fn limit(&self) -> f64 {
        match self {
            Threshold::Percentile { max_ms, .. }
            | Threshold::Average { max_ms }
            | Threshold::Maximum { max_ms } => *max_ms as f64,
            Threshold::ErrorRate { max } => *max,
        }
    }

    /// A run that sent nothing fails every rule
    pub fn evaluate(&self, summary: &RunSummary) -> ThresholdVerdict {
        let observed = self.observe(summary);
        let passed = matches!(observed, Some(value) if value < self.limit());
        ThresholdVerdict {
            threshold: *self,
            observed,
            passed,
        }
    }
}

impl fmt::Display for Threshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Threshold::Percentile { percentile, max_ms } => {
                write!(f, "p({})<{}", percentile, max_ms)
            }
            Threshold::Average { max_ms } => write!(f, "avg<{}", max_ms),
            Threshold::Maximum { max_ms } => write!(f, "max<{}", max_ms),
            Threshold::ErrorRate { max } => write!(f, "rate<{}", max),
        }
    }
}

impl Serialize for Threshold {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl FromStr for Threshold {
    type Err = ScenarioError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ScenarioError::InvalidThreshold {
            rule: s.to_string(),
            reason: reason.to_string(),
        };

        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let (metric, limit) = compact
            .split_once('<')
            .ok_or_else(|| invalid("expected '<' between metric and limit"))?;

        if metric == "rate" {
            let max: f64 = limit
                .parse()
                .map_err(|_| invalid("rate limit must be a number"))?;
            if !(0.0..=1.0).contains(&max) {
                return Err(invalid("rate limit must be between 0 and 1"));
            }
            return Ok(Threshold::ErrorRate { max });
        }

        let max_ms: u64 = limit
            .parse()
            .map_err(|_| invalid("latency limit must be whole milliseconds"))?;

        match metric {
            "avg" => Ok(Threshold::Average { max_ms }),
            "max" => Ok(Threshold::Maximum { max_ms }),
            _ => {
                let percentile: f64 = metric
                    .strip_prefix("p(")
                    .and_then(|rest| rest.strip_suffix(')'))
                    .ok_or_else(|| invalid("unknown metric; use p(N), avg, max or rate"))?
                    .parse()
                    .map_err(|_| invalid("percentile must be a number"))?;
                if !(percentile > 0.0 && percentile <= 100.0) {
                    return Err(invalid("percentile must be in (0, 100]"));
                }
                Ok(Threshold::Percentile { percentile, max_ms })
            }
        }
    }
}

/// Outcome of one rule against a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdVerdict {
    pub threshold: Threshold,
    pub observed: Option<f64>,
    pub passed: bool,
}

impl fmt::Display for ThresholdVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.passed { "PASS" } else { "FAIL" };
        match (self.threshold, self.observed) {
            (_, None) => write!(f, "{} {} (no data)", status, self.threshold),
            (Threshold::ErrorRate { .. }, Some(rate)) => {
                write!(f, "{} {} (observed {:.4})", status, self.threshold, rate)
            }
            (_, Some(ms)) => write!(f, "{} {} (observed {:.0}ms)", status, self.threshold, ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::EndpointStats;

    fn summary(successes: u64, failures: u64, latencies: &[(u64, u64)]) -> RunSummary {
        let mut stats = EndpointStats::new("GET", "/api/health");
        stats.successes = successes;
        stats.failures = failures;
        for &(ms, n) in latencies {
            stats.latency.record_n(ms, n);
        }
        RunSummary::new(1, vec![stats])
    }

    #[test]
    fn test_parse_rules() {
        assert_eq!(
            "p(95)<3000".parse::<Threshold>().unwrap(),
            Threshold::percentile(95.0, 3_000)
        );
        assert_eq!(
            "p(99.9) < 10000".parse::<Threshold>().unwrap(),
            Threshold::percentile(99.9, 10_000)
        );
        assert_eq!(
            "rate<0.1".parse::<Threshold>().unwrap(),
            Threshold::error_rate(0.1)
        );
        assert_eq!(
            "avg<500".parse::<Threshold>().unwrap(),
            Threshold::Average { max_ms: 500 }
        );
        assert_eq!(
            "max<8000".parse::<Threshold>().unwrap(),
            Threshold::Maximum { max_ms: 8_000 }
        );
    }

    #[test]
    fn test_parse_rejects_invalid_rules() {
        for rule in ["p95<3000", "p(0)<10", "p(101)<10", "rate<2", "rate>0.1", "avg<1.5", "med<10", ""] {
            let err = rule.parse::<Threshold>().unwrap_err();
            assert!(
                matches!(err, ScenarioError::InvalidThreshold { .. }),
                "{} should be rejected",
                rule
            );
        }
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for rule in ["p(95)<3000", "rate<0.15", "avg<200", "max<9000"] {
            let threshold: Threshold = rule.parse().unwrap();
            assert_eq!(threshold.to_string(), rule);
        }
    }

    #[test]
    fn test_evaluate_latency() {
        let run = summary(100, 0, &[(100, 94), (5_000, 6)]);

        let verdict = Threshold::percentile(95.0, 3_000).evaluate(&run);
        assert!(!verdict.passed);
        assert_eq!(verdict.observed, Some(5_000.0));

        let verdict = Threshold::percentile(90.0, 3_000).evaluate(&run);
        assert!(verdict.passed);

        // strict comparison
        let verdict = Threshold::Maximum { max_ms: 5_000 }.evaluate(&run);
        assert!(!verdict.passed);
    }

    #[test]
    fn test_evaluate_error_rate() {
        let run = summary(90, 10, &[(50, 100)]);
        assert!(!Threshold::error_rate(0.1).evaluate(&run).passed);
        assert!(Threshold::error_rate(0.11).evaluate(&run).passed);
    }

    #[test]
    fn test_empty_run_fails_every_rule() {
        let run = RunSummary::default();
        for threshold in [Threshold::percentile(95.0, 3_000), Threshold::error_rate(0.5)] {
            let verdict = threshold.evaluate(&run);
            assert!(!verdict.passed);
            assert_eq!(verdict.observed, None);
            assert!(verdict.to_string().contains("no data"));
        }
    }

    #[test]
    fn test_parse_all_reports_first_invalid() {
        assert_eq!(Threshold::parse_all(&["rate<0.1", "p(95)<100"]).unwrap().len(), 2);
        assert!(Threshold::parse_all(&["rate<0.1", "bogus"]).is_err());
    }
}
