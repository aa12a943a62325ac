//! # Runtime Type Checking
//!
//! Verifies an arbitrary `serde_json::Value` against a [`PropType`]
//! descriptor. Dispatch is an exhaustive `match` on [`PropKind`].
//!
//! `null` satisfies every type: absence is the required-prop check's
//! concern, not the type check's.

use std::collections::HashMap;

use regex::Regex;
use serde_json::Value;
use vigil_core::value::{as_number, is_callable, kind_name, loosely_equal};
use vigil_core::ValidationError;

use crate::schema::{ComponentSchema, PropConstraints, PropKind, PropType};

/// Check `value` against `ty`, appending one error per mismatch to `out`.
///
/// `path` names the value in diagnostics: `items[2]`, `style.color`, ...
pub fn check_type(value: &Value, ty: &PropType, path: &str, out: &mut Vec<ValidationError>) {
    if value.is_null() {
        return;
    }

    match ty.kind {
        PropKind::String => {
            if !value.is_string() {
                out.push(mismatch("prop.type.string", path, "a string", value));
            }
        }
        PropKind::Number => {
            if as_number(value).is_none() {
                out.push(mismatch("prop.type.number", path, "a number", value));
            }
        }
        PropKind::Boolean => {
            if !value.is_boolean() {
                out.push(mismatch("prop.type.boolean", path, "a boolean", value));
            }
        }
        PropKind::Array => match value {
            Value::Array(items) => {
                if let Some(element) = &ty.element_type {
                    for (i, item) in items.iter().enumerate() {
                        check_type(item, element, &format!("{path}[{i}]"), out);
                    }
                }
            }
            _ => out.push(mismatch("prop.type.array", path, "an array", value)),
        },
        PropKind::Object => match value {
            Value::Object(map) if !is_callable(value) => {
                for (key, property_type) in &ty.properties {
                    if let Some(property) = map.get(key) {
                        check_type(property, property_type, &format!("{path}.{key}"), out);
                    }
                }
            }
            _ => out.push(mismatch("prop.type.object", path, "an object", value)),
        },
        PropKind::Function => {
            if !is_callable(value) {
                out.push(mismatch("prop.type.function", path, "a function", value));
            }
        }
        PropKind::Component => {
            let is_instance =
                !is_callable(value) && value.get("type").map_or(false, Value::is_string);
            if !is_instance {
                out.push(mismatch("prop.type.component", path, "a component", value));
            }
        }
        PropKind::Union => {
            let matches_any = ty.union.iter().any(|member| {
                let mut scratch = Vec::new();
                check_type(value, member, path, &mut scratch);
                scratch.is_empty()
            });
            if !matches_any {
                let kinds: Vec<&str> = ty.union.iter().map(|m| m.kind.as_str()).collect();
                out.push(
                    ValidationError::new(
                        "prop.type.union",
                        format!(
                            "Prop '{path}' does not match any of the allowed types ({})",
                            kinds.join(" | ")
                        ),
                    )
                    .with_field(path)
                    .with_value(value.clone()),
                );
            }
        }
        PropKind::Enum => {
            if !ty.literals.iter().any(|lit| loosely_equal(lit, value)) {
                out.push(
                    ValidationError::new(
                        "prop.type.enum",
                        format!("Prop '{path}' must be one of the allowed values"),
                    )
                    .with_field(path)
                    .with_value(value.clone()),
                );
            }
        }
        PropKind::Any => {}
    }
}

fn mismatch(code: &str, path: &str, expected: &str, value: &Value) -> ValidationError {
    ValidationError::new(
        code,
        format!("Prop '{path}' must be {expected}, found {}", kind_name(value)),
    )
    .with_field(path)
    .with_value(value.clone())
}

/// Compiled `pattern` constraints keyed by their source text.
///
/// Filled when a schema is registered, so validation reuses one `Regex`
/// per distinct pattern. A pattern that fails to compile is kept as its
/// error message and reported on every string it would have checked.
#[derive(Debug, Clone, Default)]
pub struct PatternCache {
    compiled: HashMap<String, Result<Regex, String>>,
}

impl PatternCache {
    /// An empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile every pattern declared by `schema`, including variant props.
    pub fn add_schema(&mut self, schema: &ComponentSchema) {
        let props = schema
            .props
            .values()
            .chain(schema.variants.values().flat_map(|v| v.props.values()));
        for prop in props {
            if let Some(pattern) = prop.validation.as_ref().and_then(|c| c.pattern.as_deref()) {
                self.insert(pattern);
            }
        }
    }

    /// Compile `pattern` unless it is already cached.
    pub fn insert(&mut self, pattern: &str) {
        if !self.compiled.contains_key(pattern) {
            self.compiled.insert(pattern.to_owned(), compile(pattern));
        }
    }

    /// The compiled form of `pattern`, if cached.
    pub fn get(&self, pattern: &str) -> Option<&Result<Regex, String>> {
        self.compiled.get(pattern)
    }

    /// Number of distinct patterns.
    pub fn len(&self) -> usize {
        self.compiled.len()
    }

    /// Whether nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.compiled.is_empty()
    }
}

fn compile(pattern: &str) -> Result<Regex, String> {
    Regex::new(pattern).map_err(|e| e.to_string())
}

/// Check `value` against length, range, and pattern constraints.
///
/// Length and pattern apply to strings; range applies to anything that
/// reads as a number. Inapplicable constraints are skipped. Patterns
/// missing from `patterns` are compiled for this call only.
pub fn check_constraints(
    value: &Value,
    constraints: &PropConstraints,
    patterns: &PatternCache,
    path: &str,
    out: &mut Vec<ValidationError>,
) {
    if let Value::String(s) = value {
        let len = s.chars().count();
        if let Some(min) = constraints.min_length {
            if len < min {
                out.push(
                    ValidationError::new(
                        "prop.constraint.min_length",
                        format!("Prop '{path}' must be at least {min} characters long"),
                    )
                    .with_field(path),
                );
            }
        }
        if let Some(max) = constraints.max_length {
            if len > max {
                out.push(
                    ValidationError::new(
                        "prop.constraint.max_length",
                        format!("Prop '{path}' must be at most {max} characters long"),
                    )
                    .with_field(path),
                );
            }
        }
        if let Some(pattern) = &constraints.pattern {
            let uncached;
            let compiled = match patterns.get(pattern) {
                Some(cached) => cached,
                None => {
                    uncached = compile(pattern);
                    &uncached
                }
            };
            match compiled {
                Ok(re) if re.is_match(s) => {}
                Ok(_) => out.push(
                    ValidationError::new(
                        "prop.constraint.pattern",
                        format!("Prop '{path}' does not match the pattern {pattern:?}"),
                    )
                    .with_field(path)
                    .with_value(value.clone()),
                ),
                Err(e) => out.push(
                    ValidationError::new(
                        "prop.constraint.pattern_invalid",
                        format!("Pattern {pattern:?} for prop '{path}' does not compile: {e}"),
                    )
                    .with_field(path),
                ),
            }
        }
    }

    if let Some(n) = as_number(value) {
        if let Some(min) = constraints.min {
            if n < min {
                out.push(
                    ValidationError::new(
                        "prop.constraint.min",
                        format!("Prop '{path}' must be at least {min}"),
                    )
                    .with_field(path)
                    .with_value(value.clone()),
                );
            }
        }
        if let Some(max) = constraints.max {
            if n > max {
                out.push(
                    ValidationError::new(
                        "prop.constraint.max",
                        format!("Prop '{path}' must be at most {max}"),
                    )
                    .with_field(path)
                    .with_value(value.clone()),
                );
            }
        }
    }
}
