//! # Value Helpers
//!
//! Runtime shape inspection over `serde_json::Value`, shared by every
//! validator.
//!
//! JSON has no functions, so a callable prop value is represented by the
//! marker object `{"$fn": "<handler name>"}`. [`callable`] builds one and
//! [`is_callable`] recognises it.

use serde_json::{Map, Value};

/// Key of the callable marker object.
pub const CALLABLE_KEY: &str = "$fn";

/// Build a callable marker referencing `handler`.
pub fn callable(handler: impl Into<String>) -> Value {
    let mut map = Map::new();
    map.insert(CALLABLE_KEY.to_string(), Value::String(handler.into()));
    Value::Object(map)
}

/// Whether `value` is a callable marker.
pub fn is_callable(value: &Value) -> bool {
    match value {
        Value::Object(map) => {
            map.len() == 1 && map.get(CALLABLE_KEY).map_or(false, Value::is_string)
        }
        _ => false,
    }
}

/// Runtime kind name of `value`, as used in diagnostics.
pub fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) if is_callable(value) => "function",
        Value::Object(_) => "object",
    }
}

/// Numeric reading of `value`. Numeric strings are accepted.
pub fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|n| n.is_finite()),
        _ => None,
    }
}

/// Equality where numbers compare by numeric value (`1 == 1.0`).
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        _ => a == b,
    }
}

/// Whether `value` carries no content: null, `""`, `[]`, or `{}`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Short display form of a scalar, used in messages and size estimates.
pub fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
