//! # Accessibility Validator
//!
//! Holds the ordered rule set and turns check findings into an
//! [`A11yReport`].
//!
//! ## Rule gating
//!
//! A rule runs iff it is enabled, not listed in `ignore_rules`, its level is
//! included in the configured target level, and its standard is one of the
//! configured standards.
//!
//! ## Scoring
//!
//! The overall score comes from [`A11yMetrics::score`]. Each configured
//! standard scores `overall - 10 * violations tagged with it`, floored at 0.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, info};
use vigil_core::a11y::{
    A11yCategory, A11yImpact, A11yMetrics, A11yPriority, A11yReport, A11yStandard, A11ySuggestion,
    A11yViolation, A11yWarning, StandardCompliance, WcagLevel,
};
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationLevel, ValidationResult,
    ValidationRule, ValidationWarning, Validator,
};

use crate::checks::{
    A11yCheck, AltTextCheck, AriaRoleCheck, BypassBlocksCheck, ButtonNameCheck, ContrastCheck,
    DuplicateIdCheck, FindingKind, FormLabelCheck, HeadingOrderCheck, KeyboardCheck, LanguageCheck,
};
use crate::config::A11yConfig;
use crate::element::ElementTree;
use crate::error::A11yError;

/// Rule id under which the accessibility validator registers with the engine.
pub const A11Y_RULE_ID: &str = "accessibility";

/// A registered accessibility rule.
#[derive(Clone)]
pub struct A11yRule {
    /// Unique id, e.g. `wcag_1_1_1`.
    pub id: String,
    /// Display name.
    pub name: String,
    /// What the rule checks.
    pub description: String,
    /// WCAG principle.
    pub category: A11yCategory,
    /// Conformance level of the criterion.
    pub level: WcagLevel,
    /// Standard the rule is drawn from.
    pub standard: A11yStandard,
    /// Disabled rules are skipped.
    pub enabled: bool,
    /// Implementation.
    pub check: Arc<dyn A11yCheck>,
}

impl A11yRule {
    /// An enabled WCAG 2.1 rule; category comes from the check.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: WcagLevel,
        check: impl A11yCheck + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            category: check.category(),
            level,
            standard: A11yStandard::Wcag21,
            enabled: true,
            check: Arc::new(check),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the standard.
    pub fn with_standard(mut self, standard: A11yStandard) -> Self {
        self.standard = standard;
        self
    }

    fn applies(&self, config: &A11yConfig) -> bool {
        self.enabled
            && !config.ignores(&self.id)
            && config.level.includes(self.level)
            && config.standards.contains(&self.standard)
    }
}

impl fmt::Debug for A11yRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("A11yRule")
            .field("id", &self.id)
            .field("level", &self.level)
            .field("standard", &self.standard)
            .field("enabled", &self.enabled)
            .finish_non_exhaustive()
    }
}

fn builtin_rules() -> Vec<A11yRule> {
    vec![
        A11yRule::new("wcag_1_1_1", "Non-text content", WcagLevel::A, AltTextCheck)
            .with_description("Images have text alternatives"),
        A11yRule::new("wcag_1_3_1", "Info and relationships", WcagLevel::A, HeadingOrderCheck)
            .with_description("Heading levels are not skipped"),
        A11yRule::new("wcag_1_4_3", "Contrast (minimum)", WcagLevel::AA, ContrastCheck)
            .with_description("Text reaches 4.5:1 contrast, 3:1 when large"),
        A11yRule::new("wcag_2_1_1", "Keyboard", WcagLevel::A, KeyboardCheck)
            .with_description("Interactive elements are keyboard accessible"),
        A11yRule::new("wcag_2_4_1", "Bypass blocks", WcagLevel::A, BypassBlocksCheck)
            .with_description("Repeated content can be skipped"),
        A11yRule::new("wcag_3_1_1", "Language of page", WcagLevel::A, LanguageCheck)
            .with_description("Documents declare their language"),
        A11yRule::new("wcag_4_1_1", "Parsing", WcagLevel::A, DuplicateIdCheck)
            .with_description("Element ids are unique"),
        A11yRule::new("wcag_4_1_2", "Name, role, value", WcagLevel::A, AriaRoleCheck)
            .with_description("Roles are valid WAI-ARIA roles"),
        A11yRule::new("form_labels", "Form labels", WcagLevel::A, FormLabelCheck)
            .with_description("Form controls have labels"),
        A11yRule::new("button_accessible", "Button names", WcagLevel::A, ButtonNameCheck)
            .with_description("Buttons have an accessible name"),
    ]
}

/// Validates UI element trees against the accessibility rule set.
#[derive(Debug, Clone)]
pub struct AccessibilityValidator {
    config: A11yConfig,
    rules: IndexMap<String, A11yRule>,
}

impl AccessibilityValidator {
    /// A validator with the built-in rules.
    pub fn new(config: A11yConfig) -> Self {
        let mut validator = Self {
            config,
            rules: IndexMap::new(),
        };
        for rule in builtin_rules() {
            validator.add_rule(rule);
        }
        validator
    }

    /// Register `rule`, replacing one with the same id in place.
    pub fn add_rule(&mut self, rule: A11yRule) {
        let id = rule.id.clone();
        if self.rules.insert(id.clone(), rule).is_some() {
            info!(rule_id = %id, "accessibility rule replaced");
        }
    }

    /// Enable or disable a rule.
    pub fn set_rule_enabled(&mut self, id: &str, enabled: bool) -> Result<(), A11yError> {
        let rule = self
            .rules
            .get_mut(id)
            .ok_or_else(|| A11yError::UnknownRule(id.to_string()))?;
        rule.enabled = enabled;
        Ok(())
    }

    /// Rules in registration order.
    pub fn rules(&self) -> impl Iterator<Item = &A11yRule> {
        self.rules.values()
    }

    /// Active configuration.
    pub fn config(&self) -> &A11yConfig {
        &self.config
    }

    /// Run every applicable rule over `value`.
    pub fn validate_accessibility(&self, value: &Value) -> A11yReport {
        let tree = ElementTree::build(value);
        let mut metrics = A11yMetrics {
            elements_checked: tree.len(),
            ..A11yMetrics::default()
        };
        let mut violations = Vec::new();
        let mut warnings = Vec::new();
        let mut suggestions = Vec::new();

        for rule in self.rules.values().filter(|r| r.applies(&self.config)) {
            let findings = rule.check.check(&tree, &self.config);
            let mut worst: Option<(A11yImpact, String)> = None;
            let mut rule_violations = 0usize;

            for finding in findings {
                let level = finding.level.unwrap_or(rule.level);
                match finding.kind {
                    FindingKind::Violation(impact) => {
                        metrics.record(impact);
                        rule_violations += 1;
                        if worst.as_ref().map_or(true, |(w, _)| impact < *w) {
                            worst = Some((impact, finding.path.clone()));
                        }
                        violations.push(A11yViolation {
                            rule: rule.id.clone(),
                            code: finding.code,
                            message: finding.message,
                            element: finding.element,
                            path: finding.path,
                            impact,
                            category: rule.category,
                            standard: rule.standard,
                            level,
                            fix: finding.fix,
                        });
                    }
                    FindingKind::Warning => warnings.push(A11yWarning {
                        rule: rule.id.clone(),
                        code: finding.code,
                        message: finding.message,
                        element: finding.element,
                        path: finding.path,
                        category: rule.category,
                        standard: rule.standard,
                        level,
                        fix: finding.fix,
                    }),
                }
            }

            if let Some((impact, path)) = worst {
                suggestions.push(A11ySuggestion {
                    rule: rule.id.clone(),
                    message: format!("Fix {rule_violations} {} issue(s): {}", rule.name, rule.description),
                    path,
                    priority: priority_for(impact),
                });
            }
            debug!(rule_id = %rule.id, violations = rule_violations, "accessibility rule evaluated");
        }

        metrics.elements_with_issues = violations
            .iter()
            .map(|v| v.path.as_str())
            .collect::<BTreeSet<_>>()
            .len();
        let score = metrics.score();

        let standards = self
            .config
            .standards
            .iter()
            .map(|standard| {
                let count = violations.iter().filter(|v| v.standard == *standard).count();
                StandardCompliance {
                    standard: *standard,
                    level: self.config.level,
                    compliant: count == 0,
                    score: (score - 10.0 * count as f64).max(0.0),
                    violations: count,
                    warnings: warnings.iter().filter(|w| w.standard == *standard).count(),
                }
            })
            .collect();

        A11yReport {
            compliant: violations.is_empty(),
            level: self.config.level,
            score,
            violations,
            warnings,
            suggestions,
            metrics,
            standards,
            timestamp: Utc::now(),
        }
    }
}

impl Default for AccessibilityValidator {
    fn default() -> Self {
        Self::new(A11yConfig::default())
    }
}

fn priority_for(impact: A11yImpact) -> A11yPriority {
    match impact {
        A11yImpact::Critical | A11yImpact::Serious => A11yPriority::High,
        A11yImpact::Moderate => A11yPriority::Medium,
        A11yImpact::Minor => A11yPriority::Low,
    }
}

/// Convert a report into a [`ValidationResult`] at `level`. Violations
/// become errors and warnings stay warnings; the report is embedded.
pub fn report_to_result(report: A11yReport, level: ValidationLevel) -> ValidationResult {
    let mut result = ValidationResult::at_level(level);
    for v in &report.violations {
        let mut error = ValidationError::new(v.code.clone(), v.message.clone())
            .with_field(v.path.clone())
            .with_rule(v.rule.clone());
        if let Some(fix) = &v.fix {
            error = error.with_suggestion(fix.clone());
        }
        result.add_error(error);
    }
    for w in &report.warnings {
        let mut warning = ValidationWarning::new(w.code.clone(), w.message.clone())
            .with_field(w.path.clone())
            .with_rule(w.rule.clone());
        if let Some(fix) = &w.fix {
            warning = warning.with_suggestion(fix.clone());
        }
        result.add_warning(warning);
    }
    result.accessibility = Some(report);
    result
}

impl Validator for AccessibilityValidator {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        report_to_result(self.validate_accessibility(value), ctx.level)
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(A11Y_RULE_ID, "Accessibility", RuleCategory::Accessibility)
            .with_description("WCAG-style checks over UI element trees")
            .with_config("level", Value::String(self.config.level.as_str().to_string()))
    }
}
