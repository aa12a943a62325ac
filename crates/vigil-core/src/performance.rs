//! # Performance Report Model
//!
//! Per-dimension metrics produced by the performance validator. Each
//! dimension carries its own `meets_threshold` flag and free-text
//! recommendations; [`PerformanceMetrics`] adds the composite score and
//! letter grade.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Letter grade derived from the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    /// Score ≥ 90.
    A,
    /// Score ≥ 80.
    B,
    /// Score ≥ 70.
    C,
    /// Score ≥ 60.
    D,
    /// Anything lower.
    F,
}

impl Grade {
    /// Band a composite score.
    pub fn from_score(score: f64) -> Self {
        if score >= 90.0 {
            Self::A
        } else if score >= 80.0 {
            Self::B
        } else if score >= 70.0 {
            Self::C
        } else if score >= 60.0 {
            Self::D
        } else {
            Self::F
        }
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Estimated size of one entry of a `components` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComponentSize {
    /// Component type, or `component_<index>` when untyped.
    pub name: String,
    /// Estimated bytes.
    pub bytes: u64,
}

/// Bundle size dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BundleMetrics {
    /// Estimated uncompressed bytes.
    pub total_bytes: u64,
    /// Estimated compressed bytes.
    pub gzipped_bytes: u64,
    /// Per-component breakdown.
    pub components: Vec<ComponentSize>,
    /// Whether the size is within threshold.
    pub meets_threshold: bool,
    /// Recommendations.
    pub recommendations: Vec<String>,
}

/// Render time dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RenderMetrics {
    /// Duration of this run's synthetic render, in milliseconds.
    pub render_ms: f64,
    /// Mean over the retained history, in milliseconds.
    pub average_ms: f64,
    /// 95th percentile over the retained history, once enough samples exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p95_ms: Option<f64>,
    /// 99th percentile over the retained history, once enough samples exist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub p99_ms: Option<f64>,
    /// Number of retained samples.
    pub samples: usize,
    /// Frames per second implied by this run.
    pub frame_rate: f64,
    /// Whether time and frame rate are within threshold.
    pub meets_threshold: bool,
    /// Bottlenecks and recommendations.
    pub recommendations: Vec<String>,
}

/// Memory dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MemoryMetrics {
    /// Heap usage observed for this run, in bytes.
    pub heap_bytes: u64,
    /// Highest heap usage in the retained history.
    pub peak_bytes: u64,
    /// Whether the leak heuristic fired.
    pub leak_detected: bool,
    /// Whether usage is within threshold.
    pub meets_threshold: bool,
    /// Warnings and recommendations.
    pub recommendations: Vec<String>,
}

/// A complexity finding. Advisory only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComplexitySuggestion {
    /// What is too complex.
    pub issue: String,
    /// How to reduce it.
    pub suggestion: String,
    /// `high`, `medium`, or `low`.
    pub impact: String,
}

/// Structural complexity dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComplexityMetrics {
    /// Number of props.
    pub props: usize,
    /// Number of state entries.
    pub state: usize,
    /// Nesting depth.
    pub depth: usize,
    /// `props + state + depth`.
    pub cyclomatic: usize,
    /// `cyclomatic + 2 × depth`.
    pub cognitive: usize,
    /// `cyclomatic + cognitive + props + state`; compared against threshold.
    pub total: usize,
    /// Whether `total` is within threshold.
    pub meets_threshold: bool,
    /// Suggestions.
    pub suggestions: Vec<ComplexitySuggestion>,
}

/// Network dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NetworkMetrics {
    /// Estimated request count.
    pub requests: usize,
    /// Estimated total payload in bytes.
    pub payload_bytes: u64,
    /// Whether request count and payload are within threshold.
    pub meets_threshold: bool,
    /// Recommendations.
    pub recommendations: Vec<String>,
}

/// Runtime dimension, sampled from the host process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeMetrics {
    /// CPU usage percentage.
    pub cpu_percent: f64,
    /// Resident memory in bytes.
    pub resident_bytes: u64,
    /// Whether CPU and memory are within threshold.
    pub meets_threshold: bool,
    /// Alerts.
    pub recommendations: Vec<String>,
}

/// Composite performance report.
///
/// Disabled dimensions are `None` and neither pass nor fail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PerformanceMetrics {
    /// Bundle size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle: Option<BundleMetrics>,
    /// Render time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderMetrics>,
    /// Memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<MemoryMetrics>,
    /// Complexity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub complexity: Option<ComplexityMetrics>,
    /// Network.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkMetrics>,
    /// Runtime.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<RuntimeMetrics>,
    /// Composite score in `[0, 100]`.
    pub score: f64,
    /// Letter grade.
    pub grade: Grade,
    /// Whether every enabled dimension met its threshold.
    pub meets_thresholds: bool,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}
