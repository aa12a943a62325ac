//! # Structural Estimates
//!
//! Shape-based estimators used by the performance dimensions. None of them
//! inspect the host; they depend only on the JSON value.
//!
//! ## Bundle cost
//!
//! ```text
//! top level   null -> 0, otherwise 100 + body
//! object      100 + Σ (2 × key length + cost(value))
//! array       Σ cost(item)
//! string      2 × length
//! null        4
//! scalar      length of its display form
//! ```
//!
//! A top-level array also pays the 100 base; nested arrays do not.

use serde_json::{Map, Value};
use vigil_core::value::display_scalar;

const CONTAINER_BASE: u64 = 100;

/// Estimated byte cost of `value` as a bundle root.
pub fn bundle_size(value: &Value) -> u64 {
    match value {
        Value::Null => 0,
        Value::Object(map) => object_cost(map),
        Value::Array(items) => CONTAINER_BASE + items.iter().map(value_cost).sum::<u64>(),
        other => CONTAINER_BASE + display_scalar(other).len() as u64,
    }
}

fn object_cost(map: &Map<String, Value>) -> u64 {
    CONTAINER_BASE
        + map
            .iter()
            .map(|(key, val)| 2 * key.len() as u64 + value_cost(val))
            .sum::<u64>()
}

fn value_cost(value: &Value) -> u64 {
    match value {
        Value::Null => 4,
        Value::String(s) => 2 * s.len() as u64,
        Value::Object(map) => object_cost(map),
        Value::Array(items) => items.iter().map(value_cost).sum(),
        other => display_scalar(other).len() as u64,
    }
}

/// Per-entry costs of a top-level `components` array, named by `type` or
/// `component_<index>`.
pub fn component_sizes(value: &Value) -> Vec<(String, u64)> {
    let Some(Value::Array(components)) = value.get("components") else {
        return Vec::new();
    };
    components
        .iter()
        .enumerate()
        .map(|(i, component)| {
            let name = component
                .get("type")
                .and_then(Value::as_str)
                .map_or_else(|| format!("component_{i}"), str::to_string);
            (name, bundle_size(component))
        })
        .collect()
}

/// Structural complexity of an object.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComplexityScores {
    /// Entries of `props`.
    pub props: usize,
    /// Entries of `state`.
    pub state: usize,
    /// Deepest object nesting below the root.
    pub depth: usize,
    /// `props + state + depth`.
    pub cyclomatic: usize,
    /// `cyclomatic + 2 × depth`.
    pub cognitive: usize,
}

impl ComplexityScores {
    /// `cyclomatic + cognitive + props + state`.
    pub fn total(&self) -> usize {
        self.cyclomatic + self.cognitive + self.props + self.state
    }
}

/// Complexity of `value`. Non-objects score zero everywhere.
pub fn complexity(value: &Value) -> ComplexityScores {
    let Value::Object(map) = value else {
        return ComplexityScores::default();
    };
    let count = |key: &str| map.get(key).and_then(Value::as_object).map_or(0, Map::len);
    let props = count("props");
    let state = count("state");
    let depth = depth(map, 0);
    let cyclomatic = props + state + depth;
    ComplexityScores {
        props,
        state,
        depth,
        cyclomatic,
        cognitive: cyclomatic + 2 * depth,
    }
}

fn depth(map: &Map<String, Value>, current: usize) -> usize {
    map.values()
        .flat_map(|val| match val {
            Value::Object(child) => vec![child],
            Value::Array(items) => items.iter().filter_map(Value::as_object).collect(),
            _ => Vec::new(),
        })
        .map(|child| depth(child, current + 1))
        .max()
        .unwrap_or(current)
        .max(current)
}

/// Estimated request count: keys mentioning `api`, `url`, or `endpoint`
/// plus string values starting with `http`, recursing into `components`.
pub fn network_requests(value: &Value) -> usize {
    let Value::Object(map) = value else {
        return 0;
    };
    let mut requests = 0;
    for (key, val) in map {
        let key = key.to_ascii_lowercase();
        if ["api", "url", "endpoint"].iter().any(|k| key.contains(k)) {
            requests += 1;
        }
        if val.as_str().is_some_and(|s| s.starts_with("http")) {
            requests += 1;
        }
    }
    if let Some(Value::Array(components)) = map.get("components") {
        requests += components.iter().map(network_requests).sum::<usize>();
    }
    requests
}

/// Minimum sample count before percentiles are reported.
pub const MIN_PERCENTILE_SAMPLES: usize = 5;

/// The `p`th percentile of `values` by full sort and index selection:
/// index `⌊len × p / 100⌋`, clamped to the last element. `None` with fewer
/// than [`MIN_PERCENTILE_SAMPLES`] values.
pub fn percentile(values: &[f64], p: f64) -> Option<f64> {
    if values.len() < MIN_PERCENTILE_SAMPLES {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let index = ((sorted.len() as f64 * p / 100.0) as usize).min(sorted.len() - 1);
    sorted.get(index).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn bundle_costs_follow_shape() {
        assert_eq!(bundle_size(&json!(null)), 0);
        assert_eq!(bundle_size(&json!({})), 100);
        // 100 + 2*4 ("name") + 2*3 ("btn")
        assert_eq!(bundle_size(&json!({"name": "btn"})), 114);
        // 100 + 2*1 + (100 + 2*1 + 1) + 2*1 + 4
        assert_eq!(bundle_size(&json!({"a": {"b": 1}, "c": null})), 211);
        // top-level array pays the base; the nested one does not
        assert_eq!(bundle_size(&json!([["ab"]])), 104);
        assert_eq!(bundle_size(&json!(true)), 104);
    }

    #[test]
    fn component_sizes_are_named() {
        let sizes = component_sizes(&json!({"components": [{"type": "card"}, {}]}));
        assert_eq!(sizes, vec![("card".to_string(), 116), ("component_1".to_string(), 100)]);
        assert!(component_sizes(&json!({"components": "none"})).is_empty());
    }

    #[test]
    fn complexity_counts_props_state_and_depth() {
        let scores = complexity(&json!({
            "props": {"a": 1, "b": 2},
            "state": {"open": false},
            "children": [{"type": "x", "children": [{"type": "y"}]}]
        }));
        assert_eq!(scores.props, 2);
        assert_eq!(scores.state, 1);
        assert_eq!(scores.depth, 2);
        assert_eq!(scores.cyclomatic, 5);
        assert_eq!(scores.cognitive, 9);
        assert_eq!(scores.total(), 17);
        assert_eq!(complexity(&json!([1, 2])), ComplexityScores::default());
    }

    #[test]
    fn network_scan_recurses_into_components() {
        let value = json!({
            "apiBase": "https://example.com",
            "title": "x",
            "components": [
                {"dataUrl": "/local"},
                {"src": "http://cdn.example.com/a.png", "components": [{"endpoint": 1}]}
            ]
        });
        // apiBase key + value, dataUrl key, src value, endpoint key
        assert_eq!(network_requests(&value), 5);
        assert_eq!(network_requests(&json!("http://x")), 0);
    }

    #[test]
    fn percentiles_need_five_samples() {
        assert_eq!(percentile(&[1.0, 2.0, 3.0, 4.0], 95.0), None);
        let values = [5.0, 1.0, 4.0, 2.0, 3.0];
        assert_eq!(percentile(&values, 95.0), Some(5.0));
        assert_eq!(percentile(&values, 0.0), Some(1.0));
        assert_eq!(percentile(&values, 50.0), Some(3.0));
    }

    proptest! {
        #[test]
        fn percentiles_are_ordered(mut values in prop::collection::vec(0.0f64..1e4, 5..200)) {
            values.sort_by(f64::total_cmp);
            let p95 = percentile(&values, 95.0).unwrap();
            let p99 = percentile(&values, 99.0).unwrap();
            let max = values[values.len() - 1];
            prop_assert!(p95 <= p99);
            prop_assert!(p99 <= max);
        }
    }
}
