//! Performance thresholds and dimension toggles.

use serde::{Deserialize, Serialize};

const MIB: u64 = 1024 * 1024;

/// Pass/fail limits per dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PerformanceThresholds {
    /// Estimated bundle bytes.
    pub max_bundle_bytes: u64,
    /// Synthetic render time, milliseconds.
    pub max_render_ms: f64,
    /// Heap or resident bytes.
    pub max_memory_bytes: u64,
    /// `cyclomatic + cognitive + props + state`.
    pub max_complexity: usize,
    /// Estimated request count.
    pub max_network_requests: usize,
    /// Estimated payload bytes.
    pub max_payload_bytes: u64,
    /// Response time budget, milliseconds. Reported, not measured.
    pub max_response_ms: f64,
    /// Minimum frames per second.
    pub min_frame_rate: f64,
    /// Host CPU percentage.
    pub max_cpu_percent: f64,
    /// Retained history length for render times, memory snapshots, and
    /// collector samples.
    pub max_samples: usize,
}

impl Default for PerformanceThresholds {
    fn default() -> Self {
        Self {
            max_bundle_bytes: 5 * MIB,
            max_render_ms: 100.0,
            max_memory_bytes: 100 * MIB,
            max_complexity: 50,
            max_network_requests: 20,
            max_payload_bytes: MIB,
            max_response_ms: 500.0,
            min_frame_rate: 60.0,
            max_cpu_percent: 80.0,
            max_samples: 1000,
        }
    }
}

/// Settings for [`PerformanceValidator`](crate::PerformanceValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct PerformanceConfig {
    /// Estimate bundle size.
    pub bundle: bool,
    /// Time a synthetic render.
    pub render: bool,
    /// Sample memory and run the leak heuristic.
    pub memory: bool,
    /// Score structural complexity.
    pub complexity: bool,
    /// Estimate network usage.
    pub network: bool,
    /// Sample host CPU and resident memory.
    pub runtime: bool,
    /// Limits.
    pub thresholds: PerformanceThresholds,
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            bundle: true,
            render: true,
            memory: true,
            complexity: true,
            network: true,
            runtime: true,
            thresholds: PerformanceThresholds::default(),
        }
    }
}
