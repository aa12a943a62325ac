//! # Input Documents
//!
//! Subjects and schemas are read from JSON or YAML files. Files ending in
//! `.json` go through `serde_json` for precise error positions; everything
//! else goes through `serde_yaml`, which also accepts JSON.

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde_json::Value;
use vigil_component::ComponentSchema;

/// Read and parse one document.
pub fn read_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
    } else {
        serde_yaml::from_str(&text).with_context(|| format!("invalid YAML in {}", path.display()))
    }
}

/// Read component schemas.
///
/// The file holds a list of schemas, a single schema with a `name`, or a
/// map from component name to schema.
pub fn read_schemas(path: &Path) -> Result<Vec<ComponentSchema>> {
    let value = read_value(path)?;
    let decode = |value: Value, what: &str| -> Result<ComponentSchema> {
        serde_json::from_value(value)
            .with_context(|| format!("invalid component schema {what} in {}", path.display()))
    };
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(i, item)| decode(item, &format!("#{i}")))
            .collect(),
        Value::Object(map) if map.contains_key("name") => Ok(vec![decode(Value::Object(map), "")?]),
        Value::Object(map) => map
            .into_iter()
            .map(|(name, mut item)| {
                if let Value::Object(fields) = &mut item {
                    fields
                        .entry("name")
                        .or_insert_with(|| Value::String(name.clone()));
                }
                decode(item, &format!("'{name}'"))
            })
            .collect(),
        other => bail!(
            "{} must hold a schema, a list of schemas, or a map of schemas, found {}",
            path.display(),
            vigil_core::value::kind_name(&other)
        ),
    }
}
