//! # Performance Validator
//!
//! Collects each enabled dimension independently, then folds the
//! pass/fail flags into a composite score:
//!
//! | Condition | Deduction |
//! |---|---|
//! | bundle over threshold | 15 |
//! | render over threshold | 20 |
//! | memory over threshold | 15 |
//! | complexity over threshold | 10 |
//! | network over threshold | 10 |
//! | runtime over threshold | 20 |
//! | frame rate below 30 | 10 |
//! | leak heuristic fired | 25 |
//!
//! Render times and memory snapshots are kept in bounded histories behind a
//! mutex, so percentiles and the leak heuristic span calls on a shared
//! validator.

use std::collections::VecDeque;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use chrono::Utc;
use parking_lot::Mutex;
use serde_json::{json, Value};
use tracing::debug;
use vigil_core::performance::{
    BundleMetrics, ComplexityMetrics, ComplexitySuggestion, ComponentSize, Grade, MemoryMetrics,
    NetworkMetrics, PerformanceMetrics, RenderMetrics, RuntimeMetrics,
};
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationLevel, ValidationResult,
    ValidationRule, ValidationWarning, Validator,
};

use crate::collector::MetricsCollector;
use crate::config::{PerformanceConfig, PerformanceThresholds};
use crate::estimate::{self, ComplexityScores};
use crate::probe::{ResourceProbe, ResourceSample, SystemProbe};

/// Rule id under which the performance validator registers with the engine.
pub const PERF_RULE_ID: &str = "performance";

/// Synthetic render work per unit of cyclomatic complexity.
const RENDER_UNIT: Duration = Duration::from_micros(10);
/// Snapshots back that the leak heuristic compares against.
const LEAK_LOOKBACK: usize = 10;
const SEVERE_FRAME_RATE: f64 = 30.0;
const GZIP_RATIO: f64 = 0.7;
const BYTES_PER_REQUEST: u64 = 1024;

#[derive(Debug, Default)]
struct History {
    render_ms: VecDeque<f64>,
    heap_bytes: VecDeque<u64>,
}

fn push_bounded<T>(queue: &mut VecDeque<T>, value: T, cap: usize) {
    while queue.len() >= cap.max(1) {
        queue.pop_front();
    }
    queue.push_back(value);
}

/// Scores the performance characteristics of a UI value.
pub struct PerformanceValidator {
    config: PerformanceConfig,
    probe: Arc<dyn ResourceProbe>,
    history: Mutex<History>,
    collector: MetricsCollector,
}

impl std::fmt::Debug for PerformanceValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerformanceValidator")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PerformanceValidator {
    /// A validator sampling the current process.
    pub fn new(config: PerformanceConfig) -> Self {
        Self::with_probe(config, Arc::new(SystemProbe::new()))
    }

    /// A validator reading resources from `probe`.
    pub fn with_probe(config: PerformanceConfig, probe: Arc<dyn ResourceProbe>) -> Self {
        let collector = MetricsCollector::new(config.thresholds.max_samples);
        Self {
            config,
            probe,
            history: Mutex::new(History::default()),
            collector,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &PerformanceConfig {
        &self.config
    }

    /// Per-run samples: `render_ms`, `bundle_bytes`, and `score`.
    pub fn collector(&self) -> &MetricsCollector {
        &self.collector
    }

    /// Forget render and memory history.
    pub fn reset_history(&self) {
        *self.history.lock() = History::default();
    }

    /// Measure every enabled dimension of `value`.
    pub fn validate_performance(&self, value: &Value) -> PerformanceMetrics {
        let t = &self.config.thresholds;
        let scores = estimate::complexity(value);
        let sample = if self.config.memory || self.config.runtime {
            self.probe.sample()
        } else {
            None
        };

        let bundle = self.config.bundle.then(|| bundle_metrics(value, t));
        let render = self.config.render.then(|| self.render_metrics(&scores));
        let memory = self.config.memory.then(|| self.memory_metrics(sample));
        let complexity = self.config.complexity.then(|| complexity_metrics(&scores, t));
        let network = self.config.network.then(|| network_metrics(value, t));
        let runtime = self.config.runtime.then(|| runtime_metrics(sample, t));

        let passed = [
            bundle.as_ref().map(|m| m.meets_threshold),
            render.as_ref().map(|m| m.meets_threshold),
            memory.as_ref().map(|m| m.meets_threshold),
            complexity.as_ref().map(|m| m.meets_threshold),
            network.as_ref().map(|m| m.meets_threshold),
            runtime.as_ref().map(|m| m.meets_threshold),
        ];
        let meets_thresholds = passed.iter().flatten().all(|ok| *ok);

        let mut metrics = PerformanceMetrics {
            bundle,
            render,
            memory,
            complexity,
            network,
            runtime,
            score: 100.0,
            grade: Grade::A,
            meets_thresholds,
            timestamp: Utc::now(),
        };
        metrics.score = composite_score(&metrics);
        metrics.grade = Grade::from_score(metrics.score);

        if let Some(render) = &metrics.render {
            self.collector.record("render_ms", render.render_ms);
        }
        if let Some(bundle) = &metrics.bundle {
            self.collector.record("bundle_bytes", bundle.total_bytes as f64);
        }
        self.collector.record("score", metrics.score);

        debug!(
            score = metrics.score,
            grade = %metrics.grade,
            meets_thresholds,
            "performance evaluated"
        );
        metrics
    }

    fn render_metrics(&self, scores: &ComplexityScores) -> RenderMetrics {
        let t = &self.config.thresholds;
        let start = Instant::now();
        thread::sleep(RENDER_UNIT * scores.cyclomatic as u32);
        let elapsed = start.elapsed();

        let render_ms = elapsed.as_secs_f64() * 1000.0;
        let frame_rate = 1.0 / elapsed.as_secs_f64().max(1e-6);

        let (average_ms, p95_ms, p99_ms, samples) = {
            let mut history = self.history.lock();
            push_bounded(&mut history.render_ms, render_ms, t.max_samples);
            let values: Vec<f64> = history.render_ms.iter().copied().collect();
            let average = values.iter().sum::<f64>() / values.len() as f64;
            (
                average,
                estimate::percentile(&values, 95.0),
                estimate::percentile(&values, 99.0),
                values.len(),
            )
        };

        let mut recommendations = Vec::new();
        if render_ms > t.max_render_ms {
            recommendations.push(format!(
                "Render time {render_ms:.2}ms exceeds threshold {}ms",
                t.max_render_ms
            ));
        }
        if frame_rate < t.min_frame_rate {
            recommendations.push(format!(
                "Frame rate {frame_rate:.1} FPS below threshold {:.1} FPS",
                t.min_frame_rate
            ));
        }
        RenderMetrics {
            render_ms,
            average_ms,
            p95_ms,
            p99_ms,
            samples,
            frame_rate,
            meets_threshold: recommendations.is_empty(),
            recommendations,
        }
    }

    fn memory_metrics(&self, sample: Option<ResourceSample>) -> MemoryMetrics {
        let t = &self.config.thresholds;
        let mut recommendations = Vec::new();
        let Some(sample) = sample else {
            recommendations.push("Memory sampling is unavailable on this host".to_string());
            return MemoryMetrics {
                heap_bytes: 0,
                peak_bytes: 0,
                leak_detected: false,
                meets_threshold: true,
                recommendations,
            };
        };

        let heap_bytes = sample.resident_bytes;
        let (peak_bytes, leak_detected) = {
            let mut history = self.history.lock();
            push_bounded(&mut history.heap_bytes, heap_bytes, t.max_samples);
            let len = history.heap_bytes.len();
            let peak = history.heap_bytes.iter().copied().max().unwrap_or(heap_bytes);
            let leak = len > LEAK_LOOKBACK
                && history
                    .heap_bytes
                    .get(len - 1 - LEAK_LOOKBACK)
                    .is_some_and(|old| heap_bytes > old.saturating_mul(2));
            (peak, leak)
        };

        if leak_detected {
            recommendations.push(format!(
                "Potential memory leak: usage more than doubled over the last {LEAK_LOOKBACK} samples"
            ));
        }
        let meets_threshold = heap_bytes <= t.max_memory_bytes;
        if !meets_threshold {
            recommendations.push(format!(
                "Memory usage {heap_bytes} bytes exceeds threshold {} bytes",
                t.max_memory_bytes
            ));
        }
        MemoryMetrics {
            heap_bytes,
            peak_bytes,
            leak_detected,
            meets_threshold,
            recommendations,
        }
    }
}

impl Default for PerformanceValidator {
    fn default() -> Self {
        Self::new(PerformanceConfig::default())
    }
}

fn bundle_metrics(value: &Value, t: &PerformanceThresholds) -> BundleMetrics {
    let total_bytes = estimate::bundle_size(value);
    let meets_threshold = total_bytes <= t.max_bundle_bytes;
    let mut recommendations = Vec::new();
    if !meets_threshold {
        recommendations.push(format!(
            "Bundle size {total_bytes} bytes exceeds threshold {} bytes",
            t.max_bundle_bytes
        ));
    }
    BundleMetrics {
        total_bytes,
        gzipped_bytes: (total_bytes as f64 * GZIP_RATIO) as u64,
        components: estimate::component_sizes(value)
            .into_iter()
            .map(|(name, bytes)| ComponentSize { name, bytes })
            .collect(),
        meets_threshold,
        recommendations,
    }
}

fn complexity_metrics(scores: &ComplexityScores, t: &PerformanceThresholds) -> ComplexityMetrics {
    let mut suggestions = Vec::new();
    if scores.cyclomatic > 10 {
        suggestions.push(ComplexitySuggestion {
            issue: "High cyclomatic complexity".into(),
            suggestion: "Break complex components into smaller ones".into(),
            impact: "high".into(),
        });
    }
    if scores.props > 10 {
        suggestions.push(ComplexitySuggestion {
            issue: "Too many props".into(),
            suggestion: "Group related props into objects or use composition".into(),
            impact: "medium".into(),
        });
    }
    if scores.depth > 5 {
        suggestions.push(ComplexitySuggestion {
            issue: "Deep component tree".into(),
            suggestion: "Flatten the component hierarchy".into(),
            impact: "medium".into(),
        });
    }
    let total = scores.total();
    ComplexityMetrics {
        props: scores.props,
        state: scores.state,
        depth: scores.depth,
        cyclomatic: scores.cyclomatic,
        cognitive: scores.cognitive,
        total,
        meets_threshold: total <= t.max_complexity,
        suggestions,
    }
}

fn network_metrics(value: &Value, t: &PerformanceThresholds) -> NetworkMetrics {
    let requests = estimate::network_requests(value);
    let payload_bytes = requests as u64 * BYTES_PER_REQUEST;
    let mut recommendations = Vec::new();
    if requests > t.max_network_requests {
        recommendations.push(format!(
            "Reduce network requests from {requests} to {} or fewer",
            t.max_network_requests
        ));
    }
    if payload_bytes > t.max_payload_bytes {
        recommendations.push(format!(
            "Reduce total payload from {payload_bytes} to {} bytes or fewer",
            t.max_payload_bytes
        ));
    }
    NetworkMetrics {
        requests,
        payload_bytes,
        meets_threshold: recommendations.is_empty(),
        recommendations,
    }
}

fn runtime_metrics(sample: Option<ResourceSample>, t: &PerformanceThresholds) -> RuntimeMetrics {
    let Some(sample) = sample else {
        return RuntimeMetrics {
            cpu_percent: 0.0,
            resident_bytes: 0,
            meets_threshold: true,
            recommendations: vec!["Runtime sampling is unavailable on this host".to_string()],
        };
    };
    let mut recommendations = Vec::new();
    if sample.cpu_percent > t.max_cpu_percent {
        recommendations.push(format!(
            "CPU usage {:.1}% exceeds threshold {:.1}%",
            sample.cpu_percent, t.max_cpu_percent
        ));
    }
    if sample.resident_bytes > t.max_memory_bytes {
        recommendations.push(format!(
            "Resident memory {} bytes exceeds threshold {} bytes",
            sample.resident_bytes, t.max_memory_bytes
        ));
    }
    RuntimeMetrics {
        cpu_percent: sample.cpu_percent,
        resident_bytes: sample.resident_bytes,
        meets_threshold: recommendations.is_empty(),
        recommendations,
    }
}

/// Composite score of `metrics`, clamped to `[0, 100]`.
pub fn composite_score(metrics: &PerformanceMetrics) -> f64 {
    let failed = |flag: Option<bool>, deduction: f64| match flag {
        Some(false) => deduction,
        _ => 0.0,
    };
    let mut score = 100.0;
    score -= failed(metrics.bundle.as_ref().map(|m| m.meets_threshold), 15.0);
    score -= failed(metrics.render.as_ref().map(|m| m.meets_threshold), 20.0);
    score -= failed(metrics.memory.as_ref().map(|m| m.meets_threshold), 15.0);
    score -= failed(metrics.complexity.as_ref().map(|m| m.meets_threshold), 10.0);
    score -= failed(metrics.network.as_ref().map(|m| m.meets_threshold), 10.0);
    score -= failed(metrics.runtime.as_ref().map(|m| m.meets_threshold), 20.0);
    if metrics.render.as_ref().is_some_and(|r| r.frame_rate < SEVERE_FRAME_RATE) {
        score -= 10.0;
    }
    if metrics.memory.as_ref().is_some_and(|m| m.leak_detected) {
        score -= 25.0;
    }
    f64::max(score, 0.0)
}

/// Convert metrics into a [`ValidationResult`] at `level`. Each failed
/// dimension is one `performance.<dimension>.threshold` error; a suspected
/// leak is a warning. The metrics are embedded.
pub fn metrics_to_result(metrics: PerformanceMetrics, level: ValidationLevel) -> ValidationResult {
    let mut result = ValidationResult::at_level(level);
    let dimensions: [(&str, Option<(bool, &[String])>); 6] = [
        ("bundle", metrics.bundle.as_ref().map(|m| (m.meets_threshold, m.recommendations.as_slice()))),
        ("render", metrics.render.as_ref().map(|m| (m.meets_threshold, m.recommendations.as_slice()))),
        ("memory", metrics.memory.as_ref().map(|m| (m.meets_threshold, m.recommendations.as_slice()))),
        ("complexity", metrics.complexity.as_ref().map(|m| (m.meets_threshold, &[][..]))),
        ("network", metrics.network.as_ref().map(|m| (m.meets_threshold, m.recommendations.as_slice()))),
        ("runtime", metrics.runtime.as_ref().map(|m| (m.meets_threshold, m.recommendations.as_slice()))),
    ];
    for (name, outcome) in dimensions {
        let Some((false, recommendations)) = outcome else { continue };
        let message = recommendations
            .last()
            .cloned()
            .unwrap_or_else(|| format!("{name} exceeds its threshold"));
        result.add_error(
            ValidationError::new(format!("performance.{name}.threshold"), message)
                .with_field(name)
                .with_rule(PERF_RULE_ID),
        );
    }
    if metrics.memory.as_ref().is_some_and(|m| m.leak_detected) {
        result.add_warning(
            ValidationWarning::new("performance.memory.leak", "Potential memory leak detected")
                .with_field("memory")
                .with_rule(PERF_RULE_ID),
        );
    }
    result.set_metadata("performance_score", json!(metrics.score));
    result.set_metadata("performance_grade", json!(metrics.grade.as_str()));
    result.performance = Some(metrics);
    result
}

impl Validator for PerformanceValidator {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        metrics_to_result(self.validate_performance(value), ctx.level)
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(PERF_RULE_ID, "Performance", RuleCategory::Performance)
            .with_description("Bundle, render, memory, complexity, network, and runtime budgets")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probe::ScriptedProbe;

    const MIB: u64 = 1024 * 1024;

    fn quiet() -> Arc<ScriptedProbe> {
        Arc::new(ScriptedProbe::constant(ResourceSample {
            cpu_percent: 5.0,
            resident_bytes: MIB,
        }))
    }

    fn validator(config: PerformanceConfig) -> PerformanceValidator {
        PerformanceValidator::with_probe(config, quiet())
    }

    #[test]
    fn small_component_scores_a() {
        let v = validator(PerformanceConfig {
            render: false,
            ..PerformanceConfig::default()
        });
        let m = v.validate_performance(&serde_json::json!({"type": "button", "props": {"label": "Save"}}));
        assert!(m.meets_thresholds, "{m:?}");
        assert_eq!(m.score, 100.0);
        assert_eq!(m.grade, Grade::A);
        assert!(m.render.is_none());
        assert_eq!(m.runtime.as_ref().map(|r| r.resident_bytes), Some(MIB));
    }

    #[test]
    fn bundle_and_render_failures_grade_d() {
        let mut config = PerformanceConfig::default();
        config.thresholds.max_bundle_bytes = 10;
        // Any achievable frame rate is below this, while the render stays
        // far faster than 30 FPS.
        config.thresholds.min_frame_rate = 1e12;
        let m = validator(config).validate_performance(&serde_json::json!({"type": "card"}));

        assert!(!m.bundle.as_ref().unwrap().meets_threshold);
        let render = m.render.as_ref().unwrap();
        assert!(!render.meets_threshold);
        assert!(render.frame_rate >= 30.0);
        assert_eq!(m.score, 65.0);
        assert_eq!(m.grade, Grade::D);
        assert!(!m.meets_thresholds);
    }

    #[test]
    fn leak_fires_after_doubling_over_ten_samples() {
        let config = PerformanceConfig {
            bundle: false,
            render: false,
            complexity: false,
            network: false,
            runtime: false,
            ..PerformanceConfig::default()
        };
        let mut script: Vec<ResourceSample> = (0..10)
            .map(|_| ResourceSample {
                cpu_percent: 0.0,
                resident_bytes: MIB,
            })
            .collect();
        script.push(ResourceSample {
            cpu_percent: 0.0,
            resident_bytes: 3 * MIB,
        });
        let v = PerformanceValidator::with_probe(config, Arc::new(ScriptedProbe::new(script)));
        let value = serde_json::json!({});
        for _ in 0..10 {
            assert!(!v.validate_performance(&value).memory.unwrap().leak_detected);
        }
        let m = v.validate_performance(&value);
        let memory = m.memory.as_ref().unwrap();
        assert!(memory.leak_detected);
        assert_eq!(memory.peak_bytes, 3 * MIB);
        assert_eq!(m.score, 75.0);
    }

    #[test]
    fn percentiles_appear_after_five_renders() {
        let v = validator(PerformanceConfig::default());
        let value = serde_json::json!({"props": {"a": 1}});
        for _ in 0..4 {
            assert!(v.validate_performance(&value).render.unwrap().p95_ms.is_none());
        }
        let render = v.validate_performance(&value).render.unwrap();
        assert_eq!(render.samples, 5);
        let (p95, p99) = (render.p95_ms.unwrap(), render.p99_ms.unwrap());
        assert!(p95 <= p99);
        assert_eq!(v.collector().samples("score").len(), 5);
    }

    #[test]
    fn hot_cpu_fails_runtime() {
        let probe = Arc::new(ScriptedProbe::constant(ResourceSample {
            cpu_percent: 95.0,
            resident_bytes: MIB,
        }));
        let config = PerformanceConfig {
            render: false,
            ..PerformanceConfig::default()
        };
        let m = PerformanceValidator::with_probe(config, probe).validate_performance(&serde_json::json!({}));
        assert!(!m.runtime.as_ref().unwrap().meets_threshold);
        assert_eq!(m.score, 80.0);
        assert_eq!(m.grade, Grade::B);
    }

    #[test]
    fn complexity_suggestions_and_threshold() {
        let props: serde_json::Map<String, Value> =
            (0..12).map(|i| (format!("p{i}"), Value::from(i))).collect();
        let m = validator(PerformanceConfig {
            render: false,
            ..PerformanceConfig::default()
        })
        .validate_performance(&serde_json::json!({"props": props}));
        let c = m.complexity.unwrap();
        // props 12, depth 1, cyclomatic 13, cognitive 15, total 40
        assert_eq!(c.total, 40);
        assert!(c.meets_threshold);
        let issues: Vec<_> = c.suggestions.iter().map(|s| s.issue.as_str()).collect();
        assert_eq!(issues, vec!["High cyclomatic complexity", "Too many props"]);
    }

    #[test]
    fn result_conversion_reports_failed_dimensions() {
        let mut config = PerformanceConfig {
            render: false,
            ..PerformanceConfig::default()
        };
        config.thresholds.max_network_requests = 0;
        let v = validator(config);
        let ctx = ValidationContext::new(ValidationLevel::Error, vigil_core::ValidationSource::Runtime);
        let result = v.validate(&ctx, &serde_json::json!({"apiUrl": "https://api.example.com"}));
        assert!(!result.valid);
        assert_eq!(
            result.error_codes().into_iter().collect::<Vec<_>>(),
            vec!["performance.network.threshold"]
        );
        assert_eq!(result.metadata.get("performance_grade"), Some(&serde_json::json!("A")));
        assert!(result.performance.is_some());
    }
}
