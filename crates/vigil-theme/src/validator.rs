//! # Theme Validator
//!
//! Scores a theme document's design tokens. Checks and deductions:
//!
//! | Check | Finding | Deduction |
//! |---|---|---|
//! | Required tokens missing | error, report incomplete | 15 once |
//! | Token name not kebab/dot case | warning | none |
//! | Color/spacing/font-size value malformed | error | 10 each |
//! | Text on background below minimum contrast | error, report inaccessible | 10 per pair |
//! | More tokens than the maximum | warning | 20 |
//! | Duplicate token values | warning | 10 once |
//!
//! The score is clamped to `[0, 100]`. A theme is valid iff it has no
//! error findings and is both complete and accessible.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{json, Value};
use tracing::{debug, trace};
use vigil_a11y::parse_color;
use vigil_core::theme::{
    CompletenessReport, ContrastIssue, IncompleteCategory, ThemeReport, ThemeSeverity,
    ThemeViolation, TokenDuplicate,
};
use vigil_core::value::display_scalar;
use vigil_core::{
    RuleCategory, ValidationContext, ValidationError, ValidationLevel, ValidationResult,
    ValidationRule, ValidationWarning, Validator,
};

use crate::config::ThemeConfig;
use crate::tokens::{flatten_tokens, is_color_value, is_valid_token_name, TokenFormat, TokenMap};

/// Rule id under which the theme validator registers with the engine.
pub const THEME_RULE_ID: &str = "theme";

fn violation(
    code: &str,
    message: impl Into<String>,
    token: Option<&str>,
    severity: ThemeSeverity,
) -> ThemeViolation {
    ThemeViolation {
        code: code.to_string(),
        message: message.into(),
        token: token.map(str::to_string),
        severity,
    }
}

/// Validates theme documents.
#[derive(Debug, Clone, Default)]
pub struct ThemeValidator {
    config: ThemeConfig,
}

impl ThemeValidator {
    /// A validator with `config`.
    pub fn new(config: ThemeConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &ThemeConfig {
        &self.config
    }

    /// Run every enabled check over `theme`.
    pub fn validate_theme(&self, theme: &Value) -> ThemeReport {
        let tokens = flatten_tokens(theme);
        let mut violations = Vec::new();
        let mut score = 100.0;

        let completeness = if self.config.check_completeness {
            self.completeness(&tokens)
        } else {
            CompletenessReport {
                complete: true,
                coverage: 100.0,
                missing_categories: Vec::new(),
                incomplete: Vec::new(),
            }
        };
        if !completeness.complete {
            score -= 15.0;
            for category in &completeness.incomplete {
                violations.push(violation(
                    "missing_required_tokens",
                    format!(
                        "{} is missing required tokens: {}",
                        category.category,
                        category.missing.join(", ")
                    ),
                    None,
                    ThemeSeverity::Error,
                ));
            }
        }

        if self.config.check_format {
            for (name, value) in &tokens {
                if !is_valid_token_name(name) {
                    violations.push(violation(
                        "invalid_token_name",
                        format!("Token name '{name}' is not kebab-case or dot notation"),
                        Some(name),
                        ThemeSeverity::Warning,
                    ));
                }
                if !TokenFormat::for_token(name).accepts(value) {
                    score -= 10.0;
                    violations.push(violation(
                        "invalid_token_value",
                        format!("Token value '{}' has an invalid format", display_scalar(value)),
                        Some(name),
                        ThemeSeverity::Error,
                    ));
                }
            }
        }

        let contrast_issues = if self.config.check_accessibility {
            self.contrast_issues(&tokens)
        } else {
            Vec::new()
        };
        for issue in &contrast_issues {
            score -= 10.0;
            violations.push(violation(
                "insufficient_contrast",
                format!(
                    "{} on {} has contrast {:.2}:1, below {}:1",
                    issue.foreground_token, issue.background_token, issue.ratio, issue.required
                ),
                Some(&issue.foreground_token),
                ThemeSeverity::Error,
            ));
        }

        let mut duplicates = Vec::new();
        if self.config.check_performance {
            if tokens.len() > self.config.max_token_count {
                score -= 20.0;
                violations.push(violation(
                    "token_count_exceeded",
                    format!(
                        "Token count {} exceeds recommended maximum {}",
                        tokens.len(),
                        self.config.max_token_count
                    ),
                    None,
                    ThemeSeverity::Warning,
                ));
            }
            duplicates = find_duplicates(&tokens);
            if !duplicates.is_empty() {
                score -= 10.0;
                violations.push(violation(
                    "duplicate_values",
                    format!("{} token values are defined more than once", duplicates.len()),
                    None,
                    ThemeSeverity::Warning,
                ));
            }
        }

        let accessible = contrast_issues.is_empty();
        let has_errors = violations.iter().any(|v| v.severity == ThemeSeverity::Error);
        let report = ThemeReport {
            valid: !has_errors && completeness.complete && accessible,
            score: f64::clamp(score, 0.0, 100.0),
            token_count: tokens.len(),
            completeness,
            accessible,
            contrast_issues,
            duplicates,
            violations,
            timestamp: Utc::now(),
        };
        debug!(
            tokens = report.token_count,
            score = report.score,
            valid = report.valid,
            "theme evaluated"
        );
        report
    }

    fn completeness(&self, tokens: &TokenMap) -> CompletenessReport {
        let mut total_required = 0;
        let mut total_present = 0;
        let mut missing_categories = Vec::new();
        let mut incomplete = Vec::new();

        for (category, required) in &self.config.required {
            let missing: Vec<String> = required
                .iter()
                .filter(|token| {
                    !tokens.contains_key(&format!("{category}.{token}")) && !tokens.contains_key(token.as_str())
                })
                .cloned()
                .collect();
            let present = required.len() - missing.len();
            total_required += required.len();
            total_present += present;

            if !missing.is_empty() {
                if present == 0 {
                    missing_categories.push(category.clone());
                }
                incomplete.push(IncompleteCategory {
                    category: category.clone(),
                    coverage: present as f64 / required.len() as f64 * 100.0,
                    missing,
                });
            }
        }

        CompletenessReport {
            complete: incomplete.is_empty(),
            coverage: if total_required == 0 {
                100.0
            } else {
                total_present as f64 / total_required as f64 * 100.0
            },
            missing_categories,
            incomplete,
        }
    }

    fn contrast_issues(&self, tokens: &TokenMap) -> Vec<ContrastIssue> {
        let colors: Vec<(&str, &str)> = tokens
            .iter()
            .filter(|(name, _)| {
                let lower = name.to_ascii_lowercase();
                ["color", "background", "text", "border"].iter().any(|k| lower.contains(k))
            })
            .filter_map(|(name, value)| {
                let text = value.as_str()?;
                is_color_value(text).then_some((name.as_str(), text))
            })
            .collect();
        let named = |keys: &'static [&'static str]| {
            colors
                .iter()
                .filter(move |(name, _)| {
                    let lower = name.to_ascii_lowercase();
                    keys.iter().any(|k| lower.contains(k))
                })
                .copied()
        };

        let mut issues = Vec::new();
        for (fg_token, fg) in named(&["text", "foreground"]) {
            for (bg_token, bg) in named(&["background", "surface"]) {
                if fg_token == bg_token {
                    continue;
                }
                let (Ok(fg_rgb), Ok(bg_rgb)) = (parse_color(fg), parse_color(bg)) else {
                    trace!(fg_token, bg_token, "color pair not comparable");
                    continue;
                };
                let ratio = fg_rgb.contrast_ratio(&bg_rgb);
                if ratio < self.config.min_contrast_ratio {
                    issues.push(ContrastIssue {
                        foreground_token: fg_token.to_string(),
                        background_token: bg_token.to_string(),
                        foreground: fg.to_string(),
                        background: bg.to_string(),
                        ratio,
                        required: self.config.min_contrast_ratio,
                    });
                }
            }
        }
        issues
    }
}

fn find_duplicates(tokens: &TokenMap) -> Vec<TokenDuplicate> {
    let mut by_value: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in tokens {
        by_value.entry(display_scalar(value)).or_default().push(name.clone());
    }
    by_value
        .into_iter()
        .filter(|(_, names)| names.len() > 1)
        .map(|(value, tokens)| TokenDuplicate { value, tokens })
        .collect()
}

/// Convert a report into a [`ValidationResult`] at `level`. Error findings
/// become errors and warnings stay warnings; the report is embedded.
pub fn report_to_result(report: ThemeReport, level: ValidationLevel) -> ValidationResult {
    let mut result = ValidationResult::at_level(level);
    for v in &report.violations {
        match v.severity {
            ThemeSeverity::Error => {
                let mut error = ValidationError::new(v.code.clone(), v.message.clone()).with_rule(THEME_RULE_ID);
                if let Some(token) = &v.token {
                    error = error.with_field(token.clone());
                }
                result.add_error(error);
            }
            ThemeSeverity::Warning => {
                let mut warning =
                    ValidationWarning::new(v.code.clone(), v.message.clone()).with_rule(THEME_RULE_ID);
                if let Some(token) = &v.token {
                    warning = warning.with_field(token.clone());
                }
                result.add_warning(warning);
            }
        }
    }
    result.set_metadata("theme_score", json!(report.score));
    result.theme = Some(report);
    result
}

/// Whether `value` is a theme document: it carries `tokens` or declares
/// `kind: theme`.
pub fn is_theme(value: &Value) -> bool {
    value.get("tokens").is_some() || value.get("kind").and_then(Value::as_str) == Some("theme")
}

impl Validator for ThemeValidator {
    fn validate(&self, ctx: &ValidationContext, value: &Value) -> ValidationResult {
        if !is_theme(value) {
            return ValidationResult::at_level(ctx.level);
        }
        report_to_result(self.validate_theme(value), ctx.level)
    }

    fn rule(&self) -> ValidationRule {
        ValidationRule::new(THEME_RULE_ID, "Theme tokens", RuleCategory::Theme)
            .with_description("Completeness, format, contrast, and size of design tokens")
    }
}
