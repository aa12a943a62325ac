//! # Result Model
//!
//! [`ValidationResult`] is the single report type every validator returns.
//!
//! ## Invariants
//!
//! - `valid == true` iff no error-level entry was ever merged in.
//!   [`ValidationResult::add_error`] is the only way to add an error and it
//!   clears validity; [`ValidationResult::add_warning`] never touches it.
//! - [`ValidationResult::merge`] appends errors and warnings, ANDs validity,
//!   and applies metadata last-write-wins. It is associative over validity
//!   and over the multiset of findings.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::a11y::A11yReport;
use crate::context::ValidationLevel;
use crate::performance::PerformanceMetrics;
use crate::theme::ThemeReport;

// ---------------------------------------------------------------------------
// SourceLocation
// ---------------------------------------------------------------------------

/// Where in the subject's source a finding applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SourceLocation {
    /// Source file, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    /// 1-based line number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    /// 1-based column number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<u32>,
    /// Component or document path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

// ---------------------------------------------------------------------------
// ValidationError / ValidationWarning
// ---------------------------------------------------------------------------

/// An error-level finding. Adding one invalidates the result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationError {
    /// Stable machine-readable code, e.g. `prop.required`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Path of the offending field or prop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Component type the finding belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Id of the rule that produced the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Offending value, when useful for diagnostics.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Suggested remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source location of the subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ValidationError {
    /// Create an error with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            component: None,
            rule: None,
            value: None,
            suggestion: None,
            location: None,
        }
    }

    /// Attach the offending field path.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the component type.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attach the producing rule id.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Attach the offending value.
    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Attach a remediation hint.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.code, field, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

/// An advisory finding. Never affects validity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationWarning {
    /// Stable machine-readable code, e.g. `prop.unknown`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Path of the field or prop concerned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Component type the finding belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Id of the rule that produced the finding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,
    /// Suggested remediation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Source location of the subject.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ValidationWarning {
    /// Create a warning with a code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            field: None,
            component: None,
            rule: None,
            suggestion: None,
            location: None,
        }
    }

    /// Attach the field path.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Attach the component type.
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }

    /// Attach the producing rule id.
    pub fn with_rule(mut self, rule: impl Into<String>) -> Self {
        self.rule = Some(rule.into());
        self
    }

    /// Attach a remediation hint.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Attach a source location.
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = Some(location);
        self
    }
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(field) => write!(f, "[{}] {}: {}", self.code, field, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

// ---------------------------------------------------------------------------
// ValidationResult
// ---------------------------------------------------------------------------

/// Outcome of a validation call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationResult {
    /// Whether no error-level finding was merged in.
    pub valid: bool,
    /// Level the call was evaluated at.
    #[serde(default)]
    pub level: ValidationLevel,
    /// Error-level findings, in dispatch order.
    #[serde(default)]
    pub errors: Vec<ValidationError>,
    /// Advisory findings, in dispatch order.
    #[serde(default)]
    pub warnings: Vec<ValidationWarning>,
    /// Embedded accessibility report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accessibility: Option<A11yReport>,
    /// Embedded performance report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<PerformanceMetrics>,
    /// Embedded theme report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeReport>,
    /// Free-form metadata. Last write wins on merge.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// When the result was created.
    pub timestamp: DateTime<Utc>,
}

impl ValidationResult {
    /// Create a successful, empty result.
    pub fn ok() -> Self {
        Self {
            valid: true,
            level: ValidationLevel::default(),
            errors: Vec::new(),
            warnings: Vec::new(),
            accessibility: None,
            performance: None,
            theme: None,
            metadata: BTreeMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Create a failed result with the given errors.
    pub fn fail(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
            ..Self::ok()
        }
    }

    /// Create a successful result stamped with `level`.
    pub fn at_level(level: ValidationLevel) -> Self {
        Self {
            level,
            ..Self::ok()
        }
    }

    /// Add an error. Marks result as invalid.
    pub fn add_error(&mut self, error: ValidationError) {
        self.valid = false;
        self.errors.push(error);
    }

    /// Add a warning (does not affect validity).
    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Set a metadata entry, overwriting any previous value.
    pub fn set_metadata(&mut self, key: impl Into<String>, value: Value) {
        self.metadata.insert(key.into(), value);
    }

    /// Merge another result into this one.
    ///
    /// Errors and warnings are appended, validity is ANDed, metadata keys
    /// from `other` overwrite ours, and embedded reports present in `other`
    /// replace ours.
    pub fn merge(&mut self, other: ValidationResult) {
        if !other.valid {
            self.valid = false;
        }
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
        self.metadata.extend(other.metadata);
        if other.accessibility.is_some() {
            self.accessibility = other.accessibility;
        }
        if other.performance.is_some() {
            self.performance = other.performance;
        }
        if other.theme.is_some() {
            self.theme = other.theme;
        }
    }

    /// Whether the result is valid and carries no errors.
    pub fn is_valid(&self) -> bool {
        self.valid && self.errors.is_empty()
    }

    /// Whether any error was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Whether any warning was recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Errors carrying `code`.
    pub fn errors_with_code<'a>(&'a self, code: &'a str) -> impl Iterator<Item = &'a ValidationError> {
        self.errors.iter().filter(move |e| e.code == code)
    }

    /// Warnings carrying `code`.
    pub fn warnings_with_code<'a>(
        &'a self,
        code: &'a str,
    ) -> impl Iterator<Item = &'a ValidationWarning> {
        self.warnings.iter().filter(move |w| w.code == code)
    }

    /// Distinct error codes, sorted.
    pub fn error_codes(&self) -> BTreeSet<&str> {
        self.errors.iter().map(|e| e.code.as_str()).collect()
    }

    /// Distinct warning codes, sorted.
    pub fn warning_codes(&self) -> BTreeSet<&str> {
        self.warnings.iter().map(|w| w.code.as_str()).collect()
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ok_is_valid_and_empty() {
        let r = ValidationResult::ok();
        assert!(r.is_valid());
        assert!(!r.has_errors());
        assert!(!r.has_warnings());
    }

    #[test]
    fn add_error_invalidates() {
        let mut r = ValidationResult::ok();
        r.add_error(ValidationError::new("prop.required", "missing").with_field("label"));
        assert!(!r.valid);
        assert_eq!(r.errors_with_code("prop.required").count(), 1);
    }

    #[test]
    fn add_warning_keeps_validity() {
        let mut r = ValidationResult::ok();
        r.add_warning(ValidationWarning::new("prop.unknown", "unknown prop"));
        assert!(r.valid);
        assert!(r.has_warnings());
    }

    #[test]
    fn fail_with_no_errors_stays_valid() {
        assert!(ValidationResult::fail(Vec::new()).valid);
        assert!(!ValidationResult::fail(vec![ValidationError::new("x", "y")]).valid);
    }

    #[test]
    fn merge_appends_and_overwrites_metadata() {
        let mut a = ValidationResult::ok();
        a.set_metadata("k", Value::from(1));
        a.add_warning(ValidationWarning::new("w1", "first"));

        let mut b = ValidationResult::ok();
        b.set_metadata("k", Value::from(2));
        b.add_error(ValidationError::new("e1", "boom"));

        a.merge(b);
        assert!(!a.valid);
        assert_eq!(a.errors.len(), 1);
        assert_eq!(a.warnings.len(), 1);
        assert_eq!(a.metadata.get("k"), Some(&Value::from(2)));
    }

    #[test]
    fn display_includes_field() {
        let e = ValidationError::new("prop.required", "is required").with_field("label");
        assert_eq!(e.to_string(), "[prop.required] label: is required");
        let w = ValidationWarning::new("prop.unknown", "not declared");
        assert_eq!(w.to_string(), "[prop.unknown] not declared");
    }

    fn finding() -> impl Strategy<Value = (bool, String)> {
        (any::<bool>(), "[a-c]\\.[a-c]")
    }

    fn build(findings: &[(bool, String)]) -> ValidationResult {
        let mut r = ValidationResult::ok();
        for (is_error, code) in findings {
            if *is_error {
                r.add_error(ValidationError::new(code.clone(), "e"));
            } else {
                r.add_warning(ValidationWarning::new(code.clone(), "w"));
            }
        }
        r
    }

    proptest! {
        #[test]
        fn merge_is_associative_over_validity_and_findings(
            a in prop::collection::vec(finding(), 0..4),
            b in prop::collection::vec(finding(), 0..4),
            c in prop::collection::vec(finding(), 0..4),
        ) {
            // a + (b + c)
            let mut left = build(&a);
            let mut ab = build(&b);
            ab.merge(build(&c));
            left.merge(ab);

            // (a + b) + c
            let mut right_inner = build(&a);
            right_inner.merge(build(&b));
            right_inner.merge(build(&c));

            prop_assert_eq!(left.valid, right_inner.valid);
            prop_assert_eq!(left.errors, right_inner.errors);
            prop_assert_eq!(left.warnings, right_inner.warnings);
        }

        #[test]
        fn merge_order_does_not_change_verdict(
            a in prop::collection::vec(finding(), 0..4),
            b in prop::collection::vec(finding(), 0..4),
        ) {
            let mut ab = build(&a);
            ab.merge(build(&b));
            let mut ba = build(&b);
            ba.merge(build(&a));

            prop_assert_eq!(ab.valid, ba.valid);
            prop_assert_eq!(ab.error_codes(), ba.error_codes());
            prop_assert_eq!(ab.warning_codes(), ba.warning_codes());
        }
    }
}
