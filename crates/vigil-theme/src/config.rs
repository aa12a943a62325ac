//! Theme validator configuration.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Settings for [`ThemeValidator`](crate::ThemeValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct ThemeConfig {
    /// Check required tokens per category.
    pub check_completeness: bool,
    /// Check token names and value formats.
    pub check_format: bool,
    /// Check text/background contrast.
    pub check_accessibility: bool,
    /// Check token count and duplicate values.
    pub check_performance: bool,
    /// Minimum text/background contrast ratio.
    pub min_contrast_ratio: f64,
    /// Token count above which the theme is flagged.
    pub max_token_count: usize,
    /// Required tokens per category, as names relative to the category.
    pub required: IndexMap<String, Vec<String>>,
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        let mut required = IndexMap::new();
        required.insert("colors".to_string(), names(&["primary", "background", "text-primary", "border"]));
        required.insert("spacing".to_string(), names(&["xs", "sm", "md", "lg", "xl"]));
        required.insert(
            "typography".to_string(),
            names(&["font-family-primary", "font-size-md", "line-height-normal"]),
        );
        Self {
            check_completeness: true,
            check_format: true,
            check_accessibility: true,
            check_performance: true,
            min_contrast_ratio: 4.5,
            max_token_count: 500,
            required,
        }
    }
}
