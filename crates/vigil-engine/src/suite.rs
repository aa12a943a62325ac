//! # Validation Suite
//!
//! Runs everything that applies to one value and folds it into a single
//! [`ComprehensiveReport`]:
//!
//! - a component instance goes through component dispatch;
//! - a form, field, or theme document goes through schema dispatch;
//! - anything else goes through runtime dispatch;
//! - the accessibility and performance validators run when enabled;
//! - the theme validator runs on theme documents when enabled.
//!
//! The overall score is the mean of the sub-scores that were produced.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;
use vigil_component::{looks_like_instance, ComponentSchema};
use vigil_core::a11y::A11yReport;
use vigil_core::performance::PerformanceMetrics;
use vigil_core::theme::ThemeReport;
use vigil_core::ValidationResult;
use vigil_perf::PerformanceValidator;
use vigil_schema::{DocumentKind, SchemaDocument};

use crate::config::SuiteConfig;
use crate::engine::ValidationEngine;

/// Everything the suite found for one value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComprehensiveReport {
    /// Overall verdict.
    pub valid: bool,
    /// Mean of the available sub-scores, in `[0, 100]`.
    pub score: f64,
    /// Whether warnings counted against the verdict.
    pub strict: bool,
    /// Component dispatch result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<ValidationResult>,
    /// Schema dispatch result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<ValidationResult>,
    /// Runtime dispatch result.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<ValidationResult>,
    /// Accessibility report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<A11yReport>,
    /// Performance report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    /// Theme report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeReport>,
    /// Wall-clock time for the whole run, milliseconds.
    pub duration_ms: f64,
    /// Version of the engine that produced the report.
    pub version: String,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

impl ComprehensiveReport {
    /// Total warnings across every part of the report.
    pub fn warning_count(&self) -> usize {
        let dispatched: usize = [&self.component, &self.schema, &self.runtime]
            .into_iter()
            .flatten()
            .map(|r| r.warnings.len())
            .sum();
        let a11y = self.accessibility.as_ref().map_or(0, |r| r.warnings.len());
        let theme = self.theme.as_ref().map_or(0, |r| {
            r.findings(vigil_core::theme::ThemeSeverity::Warning).count()
        });
        dispatched + a11y + theme
    }
}

/// An engine plus the sub-validator switches of a [`SuiteConfig`].
#[derive(Debug)]
pub struct ValidationSuite {
    engine: ValidationEngine,
    config: SuiteConfig,
}

impl ValidationSuite {
    /// Build a suite and its engine from `config`.
    pub fn new(config: SuiteConfig) -> Self {
        Self {
            engine: ValidationEngine::new(config.engine.clone()),
            config,
        }
    }

    /// Replace the performance validator, e.g. to inject a probe.
    pub fn with_performance(mut self, performance: PerformanceValidator) -> Self {
        self.engine = self.engine.with_performance(performance);
        self
    }

    /// Register a component schema with the underlying engine.
    pub fn register_component_schema(&mut self, schema: ComponentSchema) {
        self.engine.register_component_schema(schema);
    }

    /// The underlying engine.
    pub fn engine(&self) -> &ValidationEngine {
        &self.engine
    }

    /// Mutable access for registering extra rules.
    pub fn engine_mut(&mut self) -> &mut ValidationEngine {
        &mut self.engine
    }

    /// Suite configuration.
    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Run every applicable validation over `value`.
    pub fn validate_all(&self, value: &Value) -> ComprehensiveReport {
        let start = Instant::now();
        let kind = SchemaDocument::classify(value).kind();

        let component = looks_like_instance(value).then(|| self.engine.validate_component(value, None));
        let schema = kind.is_some().then(|| self.engine.validate_schema(value));
        let runtime = (component.is_none() && schema.is_none()).then(|| self.engine.validate_runtime(value));

        let accessibility = self
            .config
            .accessibility
            .then(|| self.engine.accessibility_validator().validate_accessibility(value));
        let performance = self
            .config
            .performance
            .then(|| self.engine.performance_validator().validate_performance(value));
        let theme = (self.config.theme && kind == Some(DocumentKind::Theme))
            .then(|| self.engine.theme_validator().validate_theme(value));

        let mut valid = [&component, &schema, &runtime]
            .into_iter()
            .flatten()
            .all(ValidationResult::is_valid);
        valid &= accessibility.as_ref().map_or(true, |r| r.compliant);
        valid &= performance.as_ref().map_or(true, |m| m.meets_thresholds);
        valid &= theme.as_ref().map_or(true, |t| t.valid);

        let scores: Vec<f64> = [
            accessibility.as_ref().map(|r| r.score),
            performance.as_ref().map(|m| m.score),
            theme.as_ref().map(|t| t.score),
        ]
        .into_iter()
        .flatten()
        .collect();

        let mut report = ComprehensiveReport {
            valid,
            score: 0.0,
            strict: self.config.strict,
            component,
            schema,
            runtime,
            accessibility,
            performance,
            theme,
            duration_ms: 0.0,
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
        };
        if self.config.strict && report.warning_count() > 0 {
            report.valid = false;
        }
        report.score = if scores.is_empty() {
            if report.valid {
                100.0
            } else {
                0.0
            }
        } else {
            scores.iter().sum::<f64>() / scores.len() as f64
        };
        report.duration_ms = start.elapsed().as_secs_f64() * 1000.0;

        info!(
            valid = report.valid,
            score = report.score,
            warnings = report.warning_count(),
            duration_ms = report.duration_ms,
            "suite finished"
        );
        report
    }
}

impl Default for ValidationSuite {
    fn default() -> Self {
        Self::new(SuiteConfig::default())
    }
}
