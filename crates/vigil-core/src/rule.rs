//! # Rules and the Validator Capability
//!
//! A [`ValidationRule`] is pure metadata; the behaviour lives in a
//! [`Validator`] implementation registered alongside it. The engine knows
//! nothing about validator internals: implementing [`Validator`] and
//! registering it is the sole extension point.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::{ValidationContext, ValidationLevel};
use crate::result::ValidationResult;

/// Which concern a rule belongs to. Used for report statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleCategory {
    /// Component instance checks.
    Component,
    /// Schema definition checks.
    Schema,
    /// Accessibility checks.
    Accessibility,
    /// Performance checks.
    Performance,
    /// Theme checks.
    Theme,
    /// Runtime data checks.
    Runtime,
}

impl RuleCategory {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Schema => "schema",
            Self::Accessibility => "accessibility",
            Self::Performance => "performance",
            Self::Theme => "theme",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rule metadata. The id is unique within a registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationRule {
    /// Stable, unique identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the rule checks.
    #[serde(default)]
    pub description: String,
    /// Concern the rule belongs to.
    pub category: RuleCategory,
    /// Severity level of the rule's findings.
    pub level: ValidationLevel,
    /// Disabled rules stay registered but are never dispatched.
    pub enabled: bool,
    /// Rule-specific configuration.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, Value>,
}

impl ValidationRule {
    /// Create an enabled, error-level rule.
    pub fn new(id: impl Into<String>, name: impl Into<String>, category: RuleCategory) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category,
            level: ValidationLevel::Error,
            enabled: true,
            config: BTreeMap::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the severity level.
    pub fn with_level(mut self, level: ValidationLevel) -> Self {
        self.level = level;
        self
    }

    /// Set the enabled flag.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Add a configuration entry.
    pub fn with_config(mut self, key: impl Into<String>, value: Value) -> Self {
        self.config.insert(key.into(), value);
        self
    }
}

/// The validation capability.
///
/// Implementations must not panic on unexpected input: a value whose shape
/// the validator does not handle yields [`ValidationResult::ok`], and a value
/// it is responsible for but cannot interpret yields a structured error.
pub trait Validator: Send + Sync {
    /// Validate `value` under `ctx`.
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult;

    /// Metadata describing this validator's rule.
    fn rule(&self) -> ValidationRule;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ValidationSource;
    use crate::result::ValidationError;

    struct RejectNull;

    impl Validator for RejectNull {
        fn validate(&self, _ctx: &ValidationContext, value: &Value) -> ValidationResult {
            let mut result = ValidationResult::ok();
            if value.is_null() {
                result.add_error(ValidationError::new("value.null", "null is not allowed"));
            }
            result
        }

        fn rule(&self) -> ValidationRule {
            ValidationRule::new("runtime.non_null", "Non-null", RuleCategory::Runtime)
        }
    }

    #[test]
    fn validator_is_object_safe() {
        let v: Box<dyn Validator> = Box::new(RejectNull);
        let ctx = ValidationContext::new(ValidationLevel::Error, ValidationSource::Runtime);
        assert!(!v.validate(&ctx, &Value::Null).valid);
        assert!(v.validate(&ctx, &Value::from(1)).valid);
        assert_eq!(v.rule().category, RuleCategory::Runtime);
    }

    #[test]
    fn rule_builder_defaults() {
        let rule = ValidationRule::new("a.b", "A B", RuleCategory::Schema)
            .with_description("checks a b")
            .with_level(ValidationLevel::Warn)
            .with_enabled(false);
        assert_eq!(rule.level, ValidationLevel::Warn);
        assert!(!rule.enabled);
        assert_eq!(rule.category.to_string(), "schema");
    }
}
