//! # Runtime Validator
//!
//! | Check | Applies to | Code |
//! |---|---|---|
//! | `email` string has a local part and a dotted domain | input, form | `invalid_email` |
//! | `phone` string length within the configured bounds | input, form | `invalid_phone` |
//! | Required form field present | form | `missing_required_field` |
//! | `csrf_token` is a string of at least the minimum length | form | `invalid_csrf_token` |
//! | Form data is an object | form | `invalid_form` |
//!
//! Checks read the submitted values. Sanitization only shapes the copy
//! returned alongside the result, so an escaped or redacted value never
//! changes a verdict.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationResult, ValidationRule,
    ValidationSource, Validator,
};

use crate::config::RuntimeConfig;
use crate::sanitize::Sanitizer;

/// Rule id under which the runtime validator registers with the engine.
pub const RUNTIME_RULE_ID: &str = "runtime.input";

const CSRF_FIELD: &str = "csrf_token";

/// A verdict together with the sanitized data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuntimeOutcome {
    /// Findings over the submitted values.
    pub result: ValidationResult,
    /// Sanitized copy of the data; absent when sanitization is off or the
    /// data could not be read as the expected shape.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<Value>,
}

/// Validates and sanitizes data submitted at runtime.
#[derive(Debug, Clone)]
pub struct RuntimeValidator {
    config: RuntimeConfig,
    sanitizer: Sanitizer,
}

impl Default for RuntimeValidator {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}

impl RuntimeValidator {
    /// A validator with `config`.
    pub fn new(config: RuntimeConfig) -> Self {
        let sanitizer = Sanitizer::new(&config);
        Self { config, sanitizer }
    }

    /// Active configuration.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Check field formats of arbitrary input. Non-object input has no
    /// named fields and is only sanitized.
    pub fn validate_input(&self, data: &Value) -> RuntimeOutcome {
        let mut result = ValidationResult::ok();
        if let Value::Object(fields) = data {
            self.check_fields(fields, &mut result);
        }
        debug!(errors = result.errors.len(), "runtime input checked");
        RuntimeOutcome {
            result,
            sanitized: self.config.sanitize.then(|| self.sanitizer.sanitize(data)),
        }
    }

    /// Check a submitted form: field formats, required fields, and the
    /// CSRF token.
    pub fn validate_form(&self, data: &Value) -> RuntimeOutcome {
        let Value::Object(fields) = data else {
            let error = ValidationError::new("invalid_form", "Form data must be an object")
                .with_rule(RUNTIME_RULE_ID);
            return RuntimeOutcome {
                result: ValidationResult::fail(vec![error]),
                sanitized: None,
            };
        };

        let mut result = ValidationResult::ok();
        for field in &self.config.required_form_fields {
            if !fields.contains_key(field) {
                result.add_error(
                    ValidationError::new(
                        "missing_required_field",
                        format!("Required field {field} is missing"),
                    )
                    .with_field(field)
                    .with_rule(RUNTIME_RULE_ID),
                );
            }
        }
        self.check_fields(fields, &mut result);
        if let Some(token) = fields.get(CSRF_FIELD) {
            let long_enough = token
                .as_str()
                .is_some_and(|t| t.chars().count() >= self.config.min_csrf_token_length);
            if !long_enough {
                result.add_error(
                    ValidationError::new("invalid_csrf_token", "Invalid CSRF token")
                        .with_field(CSRF_FIELD)
                        .with_rule(RUNTIME_RULE_ID)
                        .with_suggestion(format!(
                            "Send a token of at least {} characters",
                            self.config.min_csrf_token_length
                        )),
                );
            }
        }
        debug!(fields = fields.len(), errors = result.errors.len(), "form checked");

        RuntimeOutcome {
            result,
            sanitized: self
                .config
                .sanitize
                .then(|| Value::Object(self.sanitizer.sanitize_form(fields))),
        }
    }

    fn check_fields(&self, fields: &Map<String, Value>, result: &mut ValidationResult) {
        if let Some(email) = fields.get("email").and_then(Value::as_str) {
            if !is_valid_email(email) {
                result.add_error(
                    ValidationError::new("invalid_email", "Invalid email format")
                        .with_field("email")
                        .with_rule(RUNTIME_RULE_ID)
                        .with_value(Value::String(email.to_string())),
                );
            }
        }
        if let Some(phone) = fields.get("phone").and_then(Value::as_str) {
            let len = phone.chars().count();
            if len < self.config.min_phone_length || len > self.config.max_phone_length {
                result.add_error(
                    ValidationError::new("invalid_phone", "Invalid phone number format")
                        .with_field("phone")
                        .with_rule(RUNTIME_RULE_ID)
                        .with_suggestion(format!(
                            "Use {} to {} characters",
                            self.config.min_phone_length, self.config.max_phone_length
                        )),
                );
            }
        }
    }
}

fn is_valid_email(email: &str) -> bool {
    email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
}

impl Validator for RuntimeValidator {
    /// Claims object data from the runtime source only. Sanitized data is
    /// attached as `sanitized` metadata.
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        if ctx.source != ValidationSource::Runtime || !value.is_object() {
            return ValidationResult::at_level(ctx.level);
        }
        let outcome = self.validate_input(value);
        let mut result = outcome.result;
        result.level = ctx.level;
        if let Some(sanitized) = outcome.sanitized {
            result.set_metadata("sanitized", sanitized);
        }
        result
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(RUNTIME_RULE_ID, "Runtime input", RuleCategory::Runtime)
            .with_description("Field formats and sanitization of data submitted at runtime")
    }
}
