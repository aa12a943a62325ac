//! # Cross-Crate Flows
//!
//! The engine wiring: custom validators next to the built-in ones, option
//! driven sub-validation, the suite, and sharing an engine across threads.

use std::sync::Arc;
use std::thread;

use serde_json::{json, Value};
use vigil_component::{ComponentSchema, PropSchema, PropType};
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationLevel, ValidationOptions,
    ValidationResult, ValidationRule, ValidationSource, Validator,
};
use vigil_engine::{SuiteConfig, ValidationEngine, ValidationSuite};
use vigil_perf::{PerformanceConfig, PerformanceValidator, ResourceSample, ScriptedProbe};
use vigil_runtime::{RuntimeConfig, RuntimeValidator, REDACTED};
use vigil_schema::{
    SchemaCategory, SchemaContext, SchemaDocument, SchemaError, SchemaReport, SchemaRule, SchemaRuleValidator,
};
use vigil_theme::{is_theme, ThemeConfig, ThemeValidator};

/// Rejects runtime payloads without an `id`.
struct RequiresId;

impl Validator for RequiresId {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        if ctx.source != ValidationSource::Runtime || value.get("id").is_some() {
            return ValidationResult::at_level(ctx.level);
        }
        ValidationResult::fail(vec![ValidationError::new("runtime.id.missing", "Payload has no id")
            .with_field("id")
            .with_rule("runtime.id")])
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new("runtime.id", "Payload id", RuleCategory::Runtime)
    }
}

fn quiet_probe() -> Arc<ScriptedProbe> {
    Arc::new(ScriptedProbe::constant(ResourceSample {
        cpu_percent: 3.0,
        resident_bytes: 8 * 1024 * 1024,
    }))
}

// =========================================================================
// 1. Custom rules dispatch alongside the built-ins
// =========================================================================

#[test]
fn custom_rule_runs_after_builtins() {
    let mut engine = ValidationEngine::default();
    engine.register(Arc::new(RequiresId));

    let report = engine.validation_report();
    assert_eq!(report.stats.total, 4);
    assert_eq!(report.stats.by_category["runtime"], 2);
    assert_eq!(report.rules.last().map(|r| r.id.as_str()), Some("runtime.id"));

    let bad = engine.validate_runtime(&json!({"name": "x"}));
    assert!(!bad.valid);
    assert_eq!(bad.errors[0].rule.as_deref(), Some("runtime.id"));
    assert!(engine.validate_runtime(&json!({"id": 1})).valid);
    assert!(engine.validate_schema(&json!({"name": "x"})).valid);
}

#[test]
fn excluding_a_rule_suppresses_its_findings() {
    let mut engine = ValidationEngine::default();
    engine.register(Arc::new(RequiresId));
    let ctx = ValidationContext::new(ValidationLevel::Warn, ValidationSource::Runtime).with_options(
        ValidationOptions {
            exclude_rules: vec!["runtime.id".into()],
            ..ValidationOptions::default()
        },
    );
    let result = engine.validate(&ctx, &json!({}));
    assert!(result.valid);
    assert_eq!(result.level, ValidationLevel::Warn);
}

// =========================================================================
// 2. Schema rules plug into the built-in schema validator
// =========================================================================

struct NoAnonymousForms;

impl SchemaRuleValidator for NoAnonymousForms {
    fn validate_schema(&self, document: &SchemaDocument, ctx: &SchemaContext) -> SchemaReport {
        let mut report = SchemaReport::ok();
        if let SchemaDocument::Form(form) = document {
            if form.title.trim().is_empty() {
                report.add_error(SchemaError {
                    code: "form.title.required".into(),
                    message: "Forms must be titled".into(),
                    path: ctx.path_to("title"),
                    category: SchemaCategory::Form,
                    rule: "form.anonymous".into(),
                    value: None,
                    suggestion: Some("Add a title".into()),
                });
            }
        }
        report
    }

    fn category(&self) -> SchemaCategory {
        SchemaCategory::Form
    }
}

#[test]
fn added_schema_rule_is_dispatched() {
    let mut engine = ValidationEngine::default();
    engine.add_schema_rule(SchemaRule::new(
        "form.anonymous",
        "No anonymous forms",
        ValidationLevel::Error,
        NoAnonymousForms,
    ));
    let result = engine.validate_schema(&json!({
        "id": "f",
        "type": "form",
        "fields": [{"name": "a", "type": "text"}]
    }));
    assert!(result.error_codes().contains("form.title.required"));
    assert_eq!(engine.schema_validator().rules().count(), 8);
}

// =========================================================================
// 3. Sub-validators embed their reports
// =========================================================================

#[test]
fn enabled_sub_validators_embed_reports() {
    let engine = ValidationEngine::default()
        .with_performance(PerformanceValidator::with_probe(PerformanceConfig::default(), quiet_probe()));
    let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Runtime).with_options(
        ValidationOptions {
            enable_accessibility: true,
            enable_performance: true,
            enable_theme: true,
            ..ValidationOptions::default()
        },
    );
    let tree = json!({"type": "main", "children": [{"type": "p", "children": ["hi"]}]});
    let result = engine.validate(&ctx, &tree);
    assert!(result.accessibility.is_some());
    assert!(result.performance.is_some());
    assert!(!is_theme(&tree));
    assert!(result.theme.is_none());
    assert!(!result.metadata.contains_key("theme_score"));

    let theme = json!({"name": "dark", "tokens": {"colors": {"primary": "#0af", "background": "#000"}}});
    let result = engine.validate(&ctx, &theme);
    let embedded = result.theme.as_ref().unwrap();
    let direct = ThemeValidator::new(ThemeConfig::default()).validate_theme(&theme);
    assert_eq!(embedded.score, direct.score);
    assert_eq!(embedded.completeness.complete, direct.completeness.complete);
    assert_eq!(
        result.metadata.get("theme_score").and_then(Value::as_f64),
        Some(direct.score)
    );
}

#[test]
fn runtime_input_flows_through_the_engine_and_forms_are_checked_directly() {
    let engine = ValidationEngine::default();
    let submitted = json!({"email": "ada@example.org", "bio": "<script>DROP</script>"});
    let result = engine.validate_runtime(&submitted);
    assert!(result.is_valid(), "{:?}", result.errors);
    assert_eq!(result.metadata["sanitized"]["bio"], json!("&lt;script&gt;&lt;/script&gt;"));

    let standalone = RuntimeValidator::new(RuntimeConfig::default());
    let form = json!({"csrf_token": "x".repeat(32), "auth_code": "1234", "phone": "12"});
    let via_engine = engine.validate_form(&form);
    let direct = standalone.validate_form(&form);
    assert_eq!(via_engine.result.error_codes(), direct.result.error_codes());
    assert_eq!(direct.result.errors[0].code, "invalid_phone");
    assert_eq!(direct.sanitized.unwrap()["auth_code"], json!(REDACTED));
}

// =========================================================================
// 4. The suite routes and scores
// =========================================================================

#[test]
fn suite_scores_a_theme_document() {
    let config = SuiteConfig {
        accessibility: false,
        ..SuiteConfig::default()
    };
    let suite = ValidationSuite::new(config.clone())
        .with_performance(PerformanceValidator::with_probe(config.engine.performance, quiet_probe()));
    let theme = json!({
        "name": "light",
        "version": "1.0.0",
        "tokens": {
            "semantic": {"surface": "#ffffff"},
            "colors": {
                "primary": "#0055cc",
                "background": "#ffffff",
                "text-primary": "#111111",
                "border": "#cccccc"
            },
            "spacing": {"xs": "4px", "sm": "8px", "md": "16px", "lg": "24px", "xl": "32px"},
            "typography": {
                "font-family-primary": "Inter",
                "font-size-md": "16px",
                "line-height-normal": "1.5"
            }
        }
    });
    let report = suite.validate_all(&theme);
    let theme_report = report.theme.as_ref().unwrap();
    assert!(theme_report.completeness.complete);
    assert!(report.schema.is_some());
    let perf = report.performance.as_ref().unwrap().score;
    assert!((report.score - (perf + theme_report.score) / 2.0).abs() < 1e-9);
}

// =========================================================================
// 5. One engine, many threads
// =========================================================================

#[test]
fn shared_engine_gives_identical_results_across_threads() {
    let mut engine = ValidationEngine::default();
    engine.register_component_schema(
        ComponentSchema::new("badge").prop("text", PropSchema::new(PropType::string()).required()),
    );
    let engine = Arc::new(engine);
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = Arc::clone(&engine);
            thread::spawn(move || {
                let props = if i % 2 == 0 { json!({"text": "new"}) } else { json!({}) };
                let result = engine.validate_component(&json!({"type": "badge", "props": props}), None);
                (i, result.valid, result.errors.len())
            })
        })
        .collect();
    for handle in handles {
        let (i, valid, errors) = handle.join().unwrap();
        assert_eq!(valid, i % 2 == 0);
        assert_eq!(errors, usize::from(i % 2 != 0));
    }
}
