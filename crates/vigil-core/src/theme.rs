//! # Theme Report Model
//!
//! Output of the theme validator: design-token completeness, format,
//! contrast, and size findings with an overall score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity of a theme finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeSeverity {
    /// Invalidates the theme.
    Error,
    /// Advisory.
    Warning,
}

/// A single theme finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ThemeViolation {
    /// Stable code, e.g. `invalid_token_value`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Dotted token path concerned.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Severity.
    pub severity: ThemeSeverity,
}

/// A required-token category that is only partly covered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IncompleteCategory {
    /// Category name, e.g. `colors`.
    pub category: String,
    /// Required tokens that are absent.
    pub missing: Vec<String>,
    /// Percentage of required tokens present.
    pub coverage: f64,
}

/// Completeness against the required-token registry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CompletenessReport {
    /// Whether every required token is present.
    pub complete: bool,
    /// Percentage of all required tokens present.
    pub coverage: f64,
    /// Categories with no required token present at all.
    pub missing_categories: Vec<String>,
    /// Categories with some required tokens missing.
    pub incomplete: Vec<IncompleteCategory>,
}

/// A text/background token pair below the minimum contrast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ContrastIssue {
    /// Foreground token path.
    pub foreground_token: String,
    /// Background token path.
    pub background_token: String,
    /// Foreground color literal.
    pub foreground: String,
    /// Background color literal.
    pub background: String,
    /// Measured contrast ratio.
    pub ratio: f64,
    /// Required minimum ratio.
    pub required: f64,
}

/// Tokens that share one value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TokenDuplicate {
    /// The shared value.
    pub value: String,
    /// Token paths carrying it, sorted.
    pub tokens: Vec<String>,
}

/// Full theme report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ThemeReport {
    /// No errors, complete, and accessible.
    pub valid: bool,
    /// Score in `[0, 100]`.
    pub score: f64,
    /// Number of flattened tokens.
    pub token_count: usize,
    /// Completeness.
    pub completeness: CompletenessReport,
    /// Whether every text/background pair reaches the minimum contrast.
    pub accessible: bool,
    /// Pairs below the minimum contrast.
    pub contrast_issues: Vec<ContrastIssue>,
    /// Duplicate values.
    pub duplicates: Vec<TokenDuplicate>,
    /// Findings in check order.
    pub violations: Vec<ThemeViolation>,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}

impl ThemeReport {
    /// Findings of the given severity.
    pub fn findings(&self, severity: ThemeSeverity) -> impl Iterator<Item = &ThemeViolation> {
        self.violations.iter().filter(move |v| v.severity == severity)
    }
}
