//! # Schema Reports
//!
//! Schema rules report path-tracked findings tagged with their category and
//! rule id. A [`SchemaReport`] converts into the engine-wide
//! [`ValidationResult`] at the crate boundary.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vigil_core::{ValidationError, ValidationLevel, ValidationResult, ValidationWarning};

/// Groups schema rules by the kind of document they inspect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaCategory {
    /// Form definitions.
    Form,
    /// Field definitions.
    Field,
    /// Theme definitions.
    Theme,
    /// Layout definitions.
    Layout,
    /// Configuration documents.
    Config,
}

impl SchemaCategory {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Field => "field",
            Self::Theme => "theme",
            Self::Layout => "layout",
            Self::Config => "config",
        }
    }
}

impl fmt::Display for SchemaCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error-level schema finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaError {
    /// Stable code, e.g. `form.structure.missing_id`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Dotted path into the schema; empty for the root.
    pub path: String,
    /// Category of the producing rule.
    pub category: SchemaCategory,
    /// Id of the producing rule.
    pub rule: String,
    /// Offending value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// An advisory schema finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaWarning {
    /// Stable code, e.g. `form.fields.empty`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Dotted path into the schema.
    pub path: String,
    /// Category of the producing rule.
    pub category: SchemaCategory,
    /// Id of the producing rule.
    pub rule: String,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

/// An improvement the schema author may apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaSuggestion {
    /// Stable code.
    pub code: String,
    /// What could be improved.
    pub message: String,
    /// Dotted path into the schema.
    pub path: String,
    /// The proposed change.
    pub suggestion: String,
    /// Whether the change is mechanical enough to apply automatically.
    pub auto_fix: bool,
    /// Category of the producing rule.
    pub category: SchemaCategory,
    /// Id of the producing rule.
    pub rule: String,
}

/// Outcome of running the schema rules over one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SchemaReport {
    /// No errors were found.
    pub valid: bool,
    /// Errors in rule order.
    #[serde(default)]
    pub errors: Vec<SchemaError>,
    /// Warnings in rule order.
    #[serde(default)]
    pub warnings: Vec<SchemaWarning>,
    /// Suggestions in rule order.
    #[serde(default)]
    pub suggestions: Vec<SchemaSuggestion>,
    /// Number of enabled rules that ran.
    #[serde(default)]
    pub rules_run: usize,
    /// Wall-clock time spent, in milliseconds.
    #[serde(default)]
    pub duration_ms: f64,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

impl SchemaReport {
    /// An empty, valid report.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
            suggestions: Vec::new(),
            rules_run: 0,
            duration_ms: 0.0,
            timestamp: Utc::now(),
        }
    }

    /// Add an error. Marks the report invalid.
    pub fn add_error(&mut self, error: SchemaError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning.
    pub fn add_warning(&mut self, warning: SchemaWarning) {
        self.warnings.push(warning);
    }

    /// Add a suggestion.
    pub fn add_suggestion(&mut self, suggestion: SchemaSuggestion) {
        self.suggestions.push(suggestion);
    }

    /// Fold `other` into this report.
    pub fn merge(&mut self, other: SchemaReport) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.suggestions.extend(other.suggestions);
    }

    /// Convert into an engine result stamped with `level`.
    ///
    /// Paths become `field`, rule ids carry over, and the suggestion count
    /// and rule count land in metadata next to `source = "schema"`.
    pub fn into_validation_result(self, level: ValidationLevel) -> ValidationResult {
        let mut result = ValidationResult::at_level(level);

        for e in self.errors {
            let mut error = ValidationError::new(e.code, e.message).with_rule(e.rule);
            if !e.path.is_empty() {
                error = error.with_field(e.path);
            }
            if let Some(value) = e.value {
                error = error.with_value(value);
            }
            if let Some(suggestion) = e.suggestion {
                error = error.with_suggestion(suggestion);
            }
            result.add_error(error);
        }

        for w in self.warnings {
            let mut warning = ValidationWarning::new(w.code, w.message).with_rule(w.rule);
            if !w.path.is_empty() {
                warning = warning.with_field(w.path);
            }
            if let Some(suggestion) = w.suggestion {
                warning = warning.with_suggestion(suggestion);
            }
            result.add_warning(warning);
        }

        let mut metadata = BTreeMap::new();
        metadata.insert("source".to_string(), Value::from("schema"));
        metadata.insert("schema_rules_run".to_string(), Value::from(self.rules_run));
        metadata.insert(
            "schema_suggestions".to_string(),
            Value::from(self.suggestions.len()),
        );
        result.metadata.extend(metadata);
        result
    }
}

impl Default for SchemaReport {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error(code: &str, path: &str) -> SchemaError {
        SchemaError {
            code: code.into(),
            message: "m".into(),
            path: path.into(),
            category: SchemaCategory::Form,
            rule: "form.schema.structure".into(),
            value: None,
            suggestion: Some("fix it".into()),
        }
    }

    #[test]
    fn merge_ands_validity() {
        let mut a = SchemaReport::ok();
        let mut b = SchemaReport::ok();
        b.add_error(error("form.structure.missing_id", "id"));
        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors.len(), 1);
    }

    #[test]
    fn converts_into_validation_result() {
        let mut report = SchemaReport::ok();
        report.add_error(error("form.structure.missing_id", "id"));
        report.add_error(error("form.structure.invalid_type", ""));
        report.add_warning(SchemaWarning {
            code: "form.fields.empty".into(),
            message: "no fields".into(),
            path: "fields".into(),
            category: SchemaCategory::Form,
            rule: "form.schema.fields".into(),
            suggestion: None,
        });
        report.rules_run = 7;

        let result = report.into_validation_result(ValidationLevel::Strict);
        assert!(!result.valid);
        assert_eq!(result.level, ValidationLevel::Strict);
        assert_eq!(result.errors[0].field.as_deref(), Some("id"));
        assert_eq!(result.errors[0].rule.as_deref(), Some("form.schema.structure"));
        assert_eq!(result.errors[0].suggestion.as_deref(), Some("fix it"));
        assert_eq!(result.errors[1].field, None);
        assert_eq!(result.warnings[0].field.as_deref(), Some("fields"));
        assert_eq!(result.metadata.get("source"), Some(&Value::from("schema")));
        assert_eq!(result.metadata.get("schema_rules_run"), Some(&Value::from(7)));
    }
}
