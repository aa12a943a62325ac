//! # Schema Validator
//!
//! An ordered registry of [`SchemaRule`]s. Every enabled rule runs against
//! every document; the per-rule reports are merged in registration order.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};
use vigil_core::{
    RuleCategory, ValidationContext, ValidationLevel, ValidationResult, ValidationRule,
    ValidationSource, Validator,
};

use crate::document::SchemaDocument;
use crate::report::{SchemaCategory, SchemaReport};
use crate::rules::{
    FieldTypeRule, FieldValidationRule, FormFieldsRule, FormStructureRule, RequiredFieldsRule,
    SchemaContext, SchemaRuleValidator, ThemeConsistencyRule, ThemeTokensRule, FIELD_TYPE,
    FIELD_VALIDATION, FORM_FIELDS, FORM_REQUIRED, FORM_STRUCTURE, THEME_CONSISTENCY, THEME_TOKENS,
};

/// Rule id under which the schema validator registers with the engine.
pub const SCHEMA_RULE_ID: &str = "schema.structure";

/// A registered schema rule: metadata plus its implementation.
#[derive(Clone)]
pub struct SchemaRule {
    /// Unique id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the rule checks.
    pub description: String,
    /// Document category.
    pub category: SchemaCategory,
    /// Severity of the rule's findings.
    pub level: ValidationLevel,
    /// Disabled rules are skipped.
    pub enabled: bool,
    /// Implementation.
    pub validator: Arc<dyn SchemaRuleValidator>,
}

impl SchemaRule {
    /// An enabled rule; category comes from the implementation.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: ValidationLevel,
        validator: impl SchemaRuleValidator + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: validator.category(),
            level,
            enabled: true,
            validator: Arc::new(validator),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

impl fmt::Debug for SchemaRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRule")
            .field("id", &self.id)
            .field("category", &self.category)
            .field("level", &self.level)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

/// Runs schema rules over schema documents.
#[derive(Debug, Clone)]
pub struct SchemaValidator {
    rules: IndexMap<String, SchemaRule>,
}

impl SchemaValidator {
    /// A validator with the built-in rule set.
    pub fn new() -> Self {
        let mut validator = Self::empty();
        for rule in builtin_rules() {
            validator.add_rule(rule);
        }
        validator
    }

    /// A validator with no rules.
    pub fn empty() -> Self {
        Self {
            rules: IndexMap::new(),
        }
    }

    /// Register `rule`. A rule with the same id is replaced in place.
    pub fn add_rule(&mut self, rule: SchemaRule) {
        let id = rule.id.clone();
        if self.rules.insert(id.clone(), rule).is_some() {
            info!(rule_id = %id, "schema rule replaced");
        }
    }

    /// Enable or disable a rule. Returns `false` for an unknown id.
    pub fn set_enabled(&mut self, id: &str, enabled: bool) -> bool {
        match self.rules.get_mut(id) {
            Some(rule) => {
                rule.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// All rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &SchemaRule> {
        self.rules.values()
    }

    /// Rules of one category in registration order.
    pub fn rules_in(&self, category: SchemaCategory) -> impl Iterator<Item = &SchemaRule> {
        self.rules.values().filter(move |r| r.category == category)
    }

    /// Run every enabled rule over `value`.
    pub fn validate_schema(&self, value: &Value) -> SchemaReport {
        let start = Instant::now();
        let document = SchemaDocument::classify(value);
        let ctx = SchemaContext::root();
        let mut report = SchemaReport::ok();

        for rule in self.rules.values().filter(|r| r.enabled) {
            let rule_report = rule.validator.validate_schema(&document, &ctx);
            debug!(
                rule_id = %rule.id,
                errors = rule_report.errors.len(),
                warnings = rule_report.warnings.len(),
                "schema rule evaluated"
            );
            report.merge(rule_report);
            report.rules_run += 1;
        }

        report.duration_ms = start.elapsed().as_secs_f64() * 1000.0;
        report
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

fn builtin_rules() -> Vec<SchemaRule> {
    vec![
        SchemaRule::new(FORM_STRUCTURE, "Form schema structure", ValidationLevel::Error, FormStructureRule)
            .with_description("Form id and type are required; a title is recommended"),
        SchemaRule::new(FORM_FIELDS, "Form fields", ValidationLevel::Error, FormFieldsRule)
            .with_description("Forms declare fields, each with a name and a type"),
        SchemaRule::new(FORM_REQUIRED, "Required fields", ValidationLevel::Warn, RequiredFieldsRule)
            .with_description("Forms balance required and optional fields"),
        SchemaRule::new(FIELD_TYPE, "Field type", ValidationLevel::Error, FieldTypeRule)
            .with_description("Field types are drawn from the supported set"),
        SchemaRule::new(FIELD_VALIDATION, "Field validation", ValidationLevel::Error, FieldValidationRule)
            .with_description("Field bounds are ordered and patterns compile"),
        SchemaRule::new(THEME_TOKENS, "Theme tokens", ValidationLevel::Error, ThemeTokensRule)
            .with_description("Themes define design tokens, including a semantic group"),
        SchemaRule::new(THEME_CONSISTENCY, "Theme consistency", ValidationLevel::Warn, ThemeConsistencyRule)
            .with_description("Themes carry a name and a version"),
    ]
}

/// Whether a dispatched value is a schema document for this validator.
/// Component instances and runtime data are left to their own validators;
/// an untyped test call is claimed unless it looks like an instance.
fn claims(source: ValidationSource, value: &Value) -> bool {
    match source {
        ValidationSource::Schema => true,
        ValidationSource::Test => value.get("fields").is_some() || !is_instance_shaped(value),
        ValidationSource::Component | ValidationSource::Runtime => false,
    }
}

fn is_instance_shaped(value: &Value) -> bool {
    value.get("type").is_some_and(Value::is_string)
        && (value.get("props").is_some() || value.get("children").is_some())
}

impl Validator for SchemaValidator {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        if !claims(ctx.source, value) {
            return ValidationResult::at_level(ctx.level);
        }
        self.validate_schema(value).into_validation_result(ctx.level)
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(SCHEMA_RULE_ID, "Schema structure", RuleCategory::Schema)
            .with_description("Validates form, field, and theme schema documents")
    }
}
