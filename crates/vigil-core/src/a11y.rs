//! # Accessibility Report Model
//!
//! Findings and aggregate metrics produced by the accessibility validator
//! and embedded in [`ValidationResult`](crate::ValidationResult).
//!
//! ## Conformance levels
//!
//! Level inclusion is transitive: a target of `AAA` admits rules declared at
//! `AAA`, `AA`, and `A`; `AA` admits `AA` and `A`; `A` admits only `A`. See
//! [`WcagLevel::includes`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Severity of an accessibility violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A11yImpact {
    /// Blocks access entirely.
    Critical,
    /// Severely impairs access.
    Serious,
    /// Impairs access for some users.
    Moderate,
    /// Minor annoyance.
    Minor,
}

impl A11yImpact {
    /// Weight used by the overall score.
    pub fn weight(&self) -> u32 {
        match self {
            Self::Critical => 4,
            Self::Serious => 3,
            Self::Moderate => 2,
            Self::Minor => 1,
        }
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Serious => "serious",
            Self::Moderate => "moderate",
            Self::Minor => "minor",
        }
    }
}

impl fmt::Display for A11yImpact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four WCAG principles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A11yCategory {
    /// Information must be presentable in ways users can perceive.
    Perceivable,
    /// Interface components must be operable.
    Operable,
    /// Information and operation must be understandable.
    Understandable,
    /// Content must be robust enough for assistive technologies.
    Robust,
}

impl A11yCategory {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Perceivable => "perceivable",
            Self::Operable => "operable",
            Self::Understandable => "understandable",
            Self::Robust => "robust",
        }
    }
}

impl fmt::Display for A11yCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// WCAG conformance level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum WcagLevel {
    /// Level A.
    A,
    /// Level AA.
    AA,
    /// Level AAA.
    AAA,
}

impl WcagLevel {
    /// Whether a target of `self` admits a rule declared at `required`.
    pub fn includes(&self, required: WcagLevel) -> bool {
        required <= *self
    }

    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::AA => "AA",
            Self::AAA => "AAA",
        }
    }
}

impl Default for WcagLevel {
    fn default() -> Self {
        Self::AA
    }
}

impl fmt::Display for WcagLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WcagLevel {
    type Err = crate::VigilError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(Self::A),
            "AA" => Ok(Self::AA),
            "AAA" => Ok(Self::AAA),
            other => Err(crate::VigilError::Config(format!(
                "unknown conformance level {other:?}; expected A, AA, or AAA"
            ))),
        }
    }
}

/// Accessibility standard a rule is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum A11yStandard {
    /// WCAG 2.1.
    #[serde(rename = "WCAG2.1")]
    Wcag21,
    /// WCAG 2.2.
    #[serde(rename = "WCAG2.2")]
    Wcag22,
    /// US Section 508.
    #[serde(rename = "Section508")]
    Section508,
    /// EN 301 549.
    #[serde(rename = "EN301549")]
    En301549,
}

impl A11yStandard {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wcag21 => "WCAG2.1",
            Self::Wcag22 => "WCAG2.2",
            Self::Section508 => "Section508",
            Self::En301549 => "EN301549",
        }
    }
}

impl fmt::Display for A11yStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Findings
// ---------------------------------------------------------------------------

/// A rule violation. Always error-equivalent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct A11yViolation {
    /// Id of the rule that fired.
    pub rule: String,
    /// Stable code, e.g. `missing_alt_text`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Description of the offending element.
    pub element: String,
    /// Path of the element in the validated tree.
    pub path: String,
    /// Severity.
    pub impact: A11yImpact,
    /// WCAG principle.
    pub category: A11yCategory,
    /// Standard the rule is drawn from.
    pub standard: A11yStandard,
    /// Conformance level of the criterion.
    pub level: WcagLevel,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

/// A best-practice shortfall. Advisory only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct A11yWarning {
    /// Id of the rule that fired.
    pub rule: String,
    /// Stable code, e.g. `alt_text_too_long`.
    pub code: String,
    /// Human-readable description.
    pub message: String,
    /// Description of the element concerned.
    pub element: String,
    /// Path of the element in the validated tree.
    pub path: String,
    /// WCAG principle.
    pub category: A11yCategory,
    /// Standard the rule is drawn from.
    pub standard: A11yStandard,
    /// Conformance level the recommendation targets.
    pub level: WcagLevel,
    /// Remediation hint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<String>,
}

/// Priority of an improvement suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum A11yPriority {
    /// Address soon.
    High,
    /// Address when convenient.
    Medium,
    /// Nice to have.
    Low,
}

/// An improvement suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct A11ySuggestion {
    /// Id of the rule that produced it.
    pub rule: String,
    /// Human-readable suggestion.
    pub message: String,
    /// Path of the element concerned.
    pub path: String,
    /// Priority.
    pub priority: A11yPriority,
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

/// Aggregate counts per impact bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct A11yMetrics {
    /// Number of elements visited.
    pub elements_checked: usize,
    /// Distinct elements with at least one violation.
    pub elements_with_issues: usize,
    /// Critical violations.
    pub critical: usize,
    /// Serious violations.
    pub serious: usize,
    /// Moderate violations.
    pub moderate: usize,
    /// Minor violations.
    pub minor: usize,
}

impl A11yMetrics {
    /// Record a violation of the given impact.
    pub fn record(&mut self, impact: A11yImpact) {
        match impact {
            A11yImpact::Critical => self.critical += 1,
            A11yImpact::Serious => self.serious += 1,
            A11yImpact::Moderate => self.moderate += 1,
            A11yImpact::Minor => self.minor += 1,
        }
    }

    /// Sum of impact weights over all recorded violations.
    pub fn weighted_issues(&self) -> u64 {
        let w = |n: usize, impact: A11yImpact| n as u64 * u64::from(impact.weight());
        w(self.critical, A11yImpact::Critical)
            + w(self.serious, A11yImpact::Serious)
            + w(self.moderate, A11yImpact::Moderate)
            + w(self.minor, A11yImpact::Minor)
    }

    /// Overall score: `100 × (1 − weighted / (4 × elements_checked))`,
    /// clamped to `[0, 100]`. Zero elements checked scores 100.
    pub fn score(&self) -> f64 {
        if self.elements_checked == 0 {
            return 100.0;
        }
        let max_possible = 4.0 * self.elements_checked as f64;
        let score = 100.0 * (1.0 - self.weighted_issues() as f64 / max_possible);
        score.clamp(0.0, 100.0)
    }
}

/// Compliance verdict for one configured standard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct StandardCompliance {
    /// The standard.
    pub standard: A11yStandard,
    /// Target level the run was configured for.
    pub level: WcagLevel,
    /// True iff no violation is tagged with this standard.
    pub compliant: bool,
    /// Overall score minus 10 per violation, floored at 0.
    pub score: f64,
    /// Violations tagged with this standard.
    pub violations: usize,
    /// Warnings tagged with this standard.
    pub warnings: usize,
}

/// Full accessibility report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct A11yReport {
    /// True iff there are no violations.
    pub compliant: bool,
    /// Target level.
    pub level: WcagLevel,
    /// Weighted score in `[0, 100]`.
    pub score: f64,
    /// Violations in rule order.
    pub violations: Vec<A11yViolation>,
    /// Warnings in rule order.
    pub warnings: Vec<A11yWarning>,
    /// Suggestions in rule order.
    pub suggestions: Vec<A11ySuggestion>,
    /// Aggregate counts.
    pub metrics: A11yMetrics,
    /// Per-standard verdicts, in configured order.
    pub standards: Vec<StandardCompliance>,
    /// When the report was produced.
    pub timestamp: DateTime<Utc>,
}
