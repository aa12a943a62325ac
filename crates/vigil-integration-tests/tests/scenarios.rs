//! # Behavioural Scenarios
//!
//! The headline behaviours of each validator, exercised through the public
//! crate APIs the way a caller would use them.

use std::sync::Arc;

use serde_json::json;
use vigil_a11y::{contrast_ratio, AccessibilityValidator, A11yConfig};
use vigil_component::{ComponentSchema, PropSchema, PropType};
use vigil_core::a11y::A11yImpact;
use vigil_core::performance::Grade;
use vigil_engine::ValidationEngine;
use vigil_perf::{
    PerformanceConfig, PerformanceThresholds, PerformanceValidator, ResourceSample, ScriptedProbe,
};

fn button_engine() -> ValidationEngine {
    let mut engine = ValidationEngine::default();
    engine.register_component_schema(
        ComponentSchema::new("button").prop("label", PropSchema::new(PropType::string()).required()),
    );
    engine
}

// =========================================================================
// 1. Component validation
// =========================================================================

#[test]
fn unregistered_type_yields_exactly_component_unknown() {
    let result = button_engine().validate_component(&json!({"type": "slider", "props": {"value": 3}}), None);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, "component.unknown");
    assert!(result.warnings.is_empty());
}

#[test]
fn button_without_label_has_one_required_error() {
    let result = button_engine().validate_component(&json!({"type": "button", "props": {}}), None);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].code, "prop.required");
    assert_eq!(result.errors[0].field.as_deref(), Some("label"));
}

#[test]
fn unknown_prop_is_only_a_warning() {
    let result = button_engine().validate_component(
        &json!({"type": "button", "props": {"label": "Save", "glow": true}}),
        None,
    );
    assert!(result.valid);
    assert!(result.errors.is_empty());
    assert_eq!(result.warnings.len(), 1);
}

#[test]
fn wrong_type_is_an_error() {
    let result = button_engine().validate_component(&json!({"type": "button", "props": {"label": 7}}), None);
    assert!(!result.valid);
    assert!(result.errors.iter().all(|e| e.field.as_deref() == Some("label")));
}

// =========================================================================
// 2. Schema validation
// =========================================================================

#[test]
fn text_field_with_inverted_lengths_conflicts() {
    let result = ValidationEngine::default().validate_schema(&json!({
        "name": "bio",
        "type": "text",
        "validation": {"minLength": 10, "maxLength": 5}
    }));
    assert!(!result.valid);
    assert!(result.error_codes().contains("field.validation.length_conflict"));
}

#[test]
fn well_formed_form_passes() {
    let result = ValidationEngine::default().validate_schema(&json!({
        "id": "signup",
        "type": "form",
        "title": "Sign up",
        "fields": [
            {"name": "email", "type": "email", "required": true},
            {"name": "nickname", "type": "text"}
        ]
    }));
    assert!(result.valid, "{:?}", result.errors);
}

// =========================================================================
// 3. Accessibility
// =========================================================================

#[test]
fn empty_alt_is_one_serious_violation() {
    let validator = AccessibilityValidator::default();
    let report = validator.validate_accessibility(&json!({"type": "img", "props": {"src": "logo.png", "alt": ""}}));
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].code, "missing_alt_text");
    assert_eq!(report.violations[0].impact, A11yImpact::Serious);
}

#[test]
fn descriptive_alt_has_no_findings() {
    let validator = AccessibilityValidator::default();
    let report =
        validator.validate_accessibility(&json!({"type": "img", "props": {"src": "logo.png", "alt": "Company logo"}}));
    assert!(report.violations.is_empty());
    assert!(report.warnings.is_empty());
    assert!(report.compliant);
}

fn text_at(size: &str, color: &str) -> serde_json::Value {
    json!({"type": "text", "style": {"color": color, "backgroundColor": "#ffffff", "fontSize": size}})
}

#[test]
fn contrast_depends_on_text_size() {
    // #8a8a8a on white is about 3.45:1.
    let ratio = contrast_ratio("#8a8a8a", "#ffffff").unwrap();
    assert!(ratio > 3.0 && ratio < 4.5, "ratio {ratio}");

    let validator = AccessibilityValidator::default();
    let small = validator.validate_accessibility(&text_at("16pt", "#8a8a8a"));
    assert_eq!(small.violations.len(), 1);
    assert_eq!(small.violations[0].code, "insufficient_contrast");

    let large = validator.validate_accessibility(&text_at("20pt", "#8a8a8a"));
    assert!(large.violations.is_empty());
    assert_eq!(large.warnings.len(), 1);
    assert_eq!(large.warnings[0].code, "contrast_aaa_recommended");
}

#[test]
fn nothing_to_check_scores_full_marks() {
    let report = AccessibilityValidator::new(A11yConfig::default()).validate_accessibility(&json!(null));
    assert_eq!(report.metrics.elements_checked, 0);
    assert_eq!(report.score, 100.0);
    assert!(report.compliant);
}

// =========================================================================
// 4. Performance
// =========================================================================

#[test]
fn bundle_and_render_failures_score_65_grade_d() {
    let config = PerformanceConfig {
        thresholds: PerformanceThresholds {
            max_bundle_bytes: 10,
            min_frame_rate: 1e12,
            ..PerformanceThresholds::default()
        },
        ..PerformanceConfig::default()
    };
    let probe = Arc::new(ScriptedProbe::constant(ResourceSample {
        cpu_percent: 1.0,
        resident_bytes: 1024 * 1024,
    }));
    let validator = PerformanceValidator::with_probe(config, probe);
    let metrics = validator.validate_performance(&json!({"title": "Dashboard", "items": [1, 2, 3]}));
    assert_eq!(metrics.score, 65.0);
    assert_eq!(metrics.grade, Grade::D);
    assert!(!metrics.meets_thresholds);
}

#[test]
fn percentiles_are_ordered_after_five_runs() {
    let probe = Arc::new(ScriptedProbe::constant(ResourceSample {
        cpu_percent: 1.0,
        resident_bytes: 1024,
    }));
    let validator = PerformanceValidator::with_probe(PerformanceConfig::default(), probe);
    let mut last = None;
    for _ in 0..5 {
        last = validator.validate_performance(&json!({"a": {"b": {"c": 1}}})).render;
    }
    let render = last.unwrap();
    assert_eq!(render.samples, 5);
    let (p95, p99) = (render.p95_ms.unwrap(), render.p99_ms.unwrap());
    let max = validator
        .collector()
        .samples("render_ms")
        .into_iter()
        .fold(f64::MIN, f64::max);
    assert!(p95 <= p99);
    assert!(p99 <= max);
}
