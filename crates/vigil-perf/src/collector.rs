//! # Metrics Collector
//!
//! A bounded window of named samples shared behind `&self`. The oldest
//! sample is evicted once the window is full.
//!
//! ## Trends
//!
//! [`MetricsCollector::trend`] compares the mean of the newer half of a
//! metric's samples with the mean of the older half. A relative change
//! within ±5% is [`Trend::Stable`]. For time and size metrics (names ending
//! in `_ms`, `_bytes`, or `_size`) lower is better; for everything else,
//! higher is better.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

const STABLE_BAND: f64 = 0.05;

/// One recorded value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MetricSample {
    /// Metric name, e.g. `render_ms`.
    pub name: String,
    /// Observed value.
    pub value: f64,
    /// When it was recorded.
    pub timestamp: DateTime<Utc>,
}

/// Direction a metric is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Getting better.
    Improving,
    /// Within ±5%, or too few samples to tell.
    Stable,
    /// Getting worse.
    Degrading,
}

impl Trend {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Stable => "stable",
            Self::Degrading => "degrading",
        }
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn lower_is_better(name: &str) -> bool {
    ["_ms", "_bytes", "_size"].iter().any(|suffix| name.ends_with(suffix))
}

fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Bounded, mutex-guarded sample window.
#[derive(Debug)]
pub struct MetricsCollector {
    capacity: usize,
    samples: Mutex<VecDeque<MetricSample>>,
}

impl MetricsCollector {
    /// A collector retaining at most `capacity` samples across all names.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: Mutex::new(VecDeque::new()),
        }
    }

    /// Record `value` under `name`.
    pub fn record(&self, name: impl Into<String>, value: f64) {
        let mut samples = self.samples.lock();
        while samples.len() >= self.capacity {
            samples.pop_front();
        }
        samples.push_back(MetricSample {
            name: name.into(),
            value,
            timestamp: Utc::now(),
        });
    }

    /// Retained values of `name`, oldest first.
    pub fn samples(&self, name: &str) -> Vec<f64> {
        self.samples
            .lock()
            .iter()
            .filter(|s| s.name == name)
            .map(|s| s.value)
            .collect()
    }

    /// Mean of the retained values of `name`.
    pub fn average(&self, name: &str) -> Option<f64> {
        mean(&self.samples(name))
    }

    /// Trend of `name`; [`Trend::Stable`] with fewer than two samples.
    pub fn trend(&self, name: &str) -> Trend {
        let values = self.samples(name);
        if values.len() < 2 {
            return Trend::Stable;
        }
        let (older, newer) = values.split_at(values.len() / 2);
        let (Some(old), Some(new)) = (mean(older), mean(newer)) else {
            return Trend::Stable;
        };

        let change = if old == 0.0 {
            if new == 0.0 {
                0.0
            } else {
                new.signum()
            }
        } else {
            (new - old) / old.abs()
        };
        if change.abs() <= STABLE_BAND {
            return Trend::Stable;
        }
        match (change > 0.0, lower_is_better(name)) {
            (true, true) | (false, false) => Trend::Degrading,
            (true, false) | (false, true) => Trend::Improving,
        }
    }

    /// Number of retained samples across all names.
    pub fn len(&self) -> usize {
        self.samples.lock().len()
    }

    /// Whether nothing is retained.
    pub fn is_empty(&self) -> bool {
        self.samples.lock().is_empty()
    }

    /// Drop every sample.
    pub fn reset(&self) {
        self.samples.lock().clear();
    }
}

impl Default for MetricsCollector {
    fn default() -> Self {
        Self::new(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_and_samples_are_per_name() {
        let c = MetricsCollector::default();
        c.record("score", 80.0);
        c.record("render_ms", 4.0);
        c.record("score", 90.0);
        assert_eq!(c.samples("score"), vec![80.0, 90.0]);
        assert_eq!(c.average("score"), Some(85.0));
        assert_eq!(c.average("bundle_bytes"), None);
    }

    #[test]
    fn window_evicts_oldest() {
        let c = MetricsCollector::new(3);
        for v in 0..5 {
            c.record("x", f64::from(v));
        }
        assert_eq!(c.samples("x"), vec![2.0, 3.0, 4.0]);
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn rising_render_time_is_degrading() {
        let c = MetricsCollector::default();
        for v in [10.0, 10.0, 20.0, 20.0] {
            c.record("render_ms", v);
        }
        assert_eq!(c.trend("render_ms"), Trend::Degrading);
    }

    #[test]
    fn rising_score_is_improving() {
        let c = MetricsCollector::default();
        for v in [60.0, 65.0, 80.0, 85.0] {
            c.record("score", v);
        }
        assert_eq!(c.trend("score"), Trend::Improving);
    }

    #[test]
    fn small_changes_are_stable() {
        let c = MetricsCollector::default();
        for v in [100.0, 100.0, 103.0, 104.0] {
            c.record("bundle_bytes", v);
        }
        assert_eq!(c.trend("bundle_bytes"), Trend::Stable);
        assert_eq!(c.trend("unknown"), Trend::Stable);
    }

    #[test]
    fn reset_clears() {
        let c = MetricsCollector::default();
        c.record("score", 1.0);
        c.reset();
        assert!(c.is_empty());
    }
}
