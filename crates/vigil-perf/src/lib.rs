//! # vigil-perf: Performance Validation
//!
//! Scores a UI value along six independent dimensions and folds them into
//! a composite score and letter grade.
//!
//! | Dimension | Source |
//! |---|---|
//! | Bundle | Recursive shape-based byte estimate |
//! | Render | Synthetic workload proportional to cyclomatic complexity |
//! | Memory | Process sample through a [`ResourceProbe`], plus a leak heuristic |
//! | Complexity | Props, state, and nesting depth |
//! | Network | Endpoint-like keys and URL values |
//! | Runtime | Process CPU and resident memory |
//!
//! Each run also records `render_ms`, `bundle_bytes`, and `score` into a
//! [`MetricsCollector`] for trend analysis.

pub mod collector;
pub mod config;
pub mod estimate;
pub mod probe;
pub mod validator;

pub use collector::{MetricSample, MetricsCollector, Trend};
pub use config::{PerformanceConfig, PerformanceThresholds};
pub use estimate::{bundle_size, complexity, network_requests, percentile, ComplexityScores};
pub use probe::{ResourceProbe, ResourceSample, ScriptedProbe, SystemProbe};
pub use validator::{composite_score, metrics_to_result, PerformanceValidator, PERF_RULE_ID};
