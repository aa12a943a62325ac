//! Registry summary returned by
//! [`ValidationEngine::validation_report`](crate::ValidationEngine::validation_report).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vigil_core::ValidationRule;

/// Counts over the registered rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RuleStats {
    /// Registered rules.
    pub total: usize,
    /// Rules that will be dispatched.
    pub enabled: usize,
    /// Rules registered but skipped.
    pub disabled: usize,
    /// Rules per category name.
    pub by_category: BTreeMap<String, usize>,
    /// Rules per level name.
    pub by_level: BTreeMap<String, usize>,
}

/// Registered rules and their statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationReport {
    /// Rules in registration order.
    pub rules: Vec<ValidationRule>,
    /// Counts.
    pub stats: RuleStats,
    /// When the report was produced.
    pub generated_at: DateTime<Utc>,
}

impl ValidationReport {
    /// Summarise `rules`.
    pub fn from_rules(rules: Vec<ValidationRule>) -> Self {
        let mut stats = RuleStats {
            total: rules.len(),
            ..RuleStats::default()
        };
        for rule in &rules {
            if rule.enabled {
                stats.enabled += 1;
            } else {
                stats.disabled += 1;
            }
            *stats.by_category.entry(rule.category.as_str().to_string()).or_default() += 1;
            *stats.by_level.entry(rule.level.as_str().to_string()).or_default() += 1;
        }
        Self {
            rules,
            stats,
            generated_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{RuleCategory, ValidationLevel};

    #[test]
    fn counts_by_category_level_and_state() {
        let report = ValidationReport::from_rules(vec![
            ValidationRule::new("a", "A", RuleCategory::Component),
            ValidationRule::new("b", "B", RuleCategory::Schema).with_level(ValidationLevel::Warn),
            ValidationRule::new("c", "C", RuleCategory::Schema).with_enabled(false),
        ]);
        let stats = &report.stats;
        assert_eq!((stats.total, stats.enabled, stats.disabled), (3, 2, 1));
        assert_eq!(stats.by_category["schema"], 2);
        assert_eq!(stats.by_category["component"], 1);
        assert_eq!(stats.by_level["error"], 2);
        assert_eq!(stats.by_level["warn"], 1);
        assert_eq!(report.rules[2].id, "c");
    }

    #[test]
    fn empty_registry() {
        let report = ValidationReport::from_rules(Vec::new());
        assert_eq!(report.stats, RuleStats::default());
    }

    proptest::proptest! {
        #[test]
        fn stats_partition_the_registry(flags in proptest::collection::vec(proptest::bool::ANY, 0..12)) {
            let rules = flags
                .iter()
                .enumerate()
                .map(|(i, on)| ValidationRule::new(format!("r{i}"), "R", RuleCategory::Runtime).with_enabled(*on))
                .collect();
            let stats = ValidationReport::from_rules(rules).stats;
            proptest::prop_assert_eq!(stats.enabled + stats.disabled, stats.total);
            proptest::prop_assert_eq!(stats.total, flags.len());
            proptest::prop_assert_eq!(stats.by_category.values().sum::<usize>(), stats.total);
        }
    }
}
