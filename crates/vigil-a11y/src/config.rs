//! Accessibility validator configuration.

use serde::{Deserialize, Serialize};
use vigil_core::a11y::{A11yStandard, WcagLevel};

/// Contrast thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ContrastConfig {
    /// Minimum ratio for normal text (AA).
    pub min_normal: f64,
    /// Minimum ratio for large text (AA).
    pub min_large: f64,
    /// Enhanced ratio (AAA); below it a warning is emitted.
    pub min_enhanced: f64,
}

impl Default for ContrastConfig {
    fn default() -> Self {
        Self {
            min_normal: 4.5,
            min_large: 3.0,
            min_enhanced: 7.0,
        }
    }
}

/// Settings for [`AccessibilityValidator`](crate::AccessibilityValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct A11yConfig {
    /// Target conformance level.
    pub level: WcagLevel,
    /// Standards whose rules run.
    pub standards: Vec<A11yStandard>,
    /// Contrast thresholds.
    pub contrast: ContrastConfig,
    /// Alt text longer than this draws a warning.
    pub alt_text_max_length: usize,
    /// Rule ids to skip.
    pub ignore_rules: Vec<String>,
}

impl Default for A11yConfig {
    fn default() -> Self {
        Self {
            level: WcagLevel::AA,
            standards: vec![A11yStandard::Wcag21],
            contrast: ContrastConfig::default(),
            alt_text_max_length: 125,
            ignore_rules: Vec::new(),
        }
    }
}

impl A11yConfig {
    /// Default settings at `level`.
    pub fn at_level(level: WcagLevel) -> Self {
        Self {
            level,
            ..Self::default()
        }
    }

    /// Whether `id` is listed in `ignore_rules`.
    pub fn ignores(&self, id: &str) -> bool {
        self.ignore_rules.iter().any(|r| r == id)
    }
}
