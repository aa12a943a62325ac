//! # Component Instances
//!
//! The subject of component validation: a type tag, props, children, slot
//! contents, and an optional source location. Instances are ephemeral and
//! constructed per call, usually from a `serde_json::Value`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use vigil_core::value::kind_name;
use vigil_core::{SourceLocation, VigilError, VigilResult};

/// A child of an instance: a nested instance or a text node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Child {
    /// A nested component instance.
    Instance(ComponentInstance),
    /// Text content.
    Text(String),
}

impl Child {
    /// Type name used in diagnostics; text nodes are `#text`.
    pub fn type_name(&self) -> &str {
        match self {
            Self::Instance(instance) => &instance.type_name,
            Self::Text(_) => "#text",
        }
    }
}

/// An instance being validated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComponentInstance {
    /// Declared component type.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Supplied props.
    #[serde(default)]
    pub props: Map<String, Value>,
    /// Children.
    #[serde(default)]
    pub children: Vec<Child>,
    /// Slot contents by slot name.
    #[serde(default)]
    pub slots: Map<String, Value>,
    /// Where the instance was authored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<SourceLocation>,
}

impl ComponentInstance {
    /// An instance of `type_name` with no props or children.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            props: Map::new(),
            children: Vec::new(),
            slots: Map::new(),
            location: None,
        }
    }

    /// Add a prop.
    pub fn with_prop(mut self, name: impl Into<String>, value: Value) -> Self {
        self.props.insert(name.into(), value);
        self
    }

    /// Add a child instance.
    pub fn with_child(mut self, child: ComponentInstance) -> Self {
        self.children.push(Child::Instance(child));
        self
    }

    /// Add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Child::Text(text.into()));
        self
    }

    /// Fill a slot.
    pub fn with_slot(mut self, name: impl Into<String>, content: Value) -> Self {
        self.slots.insert(name.into(), content);
        self
    }

    /// Decode an instance from a JSON value.
    pub fn from_value(value: &Value) -> VigilResult<Self> {
        if !value.is_object() {
            return Err(VigilError::Shape {
                expected: "component instance object".into(),
                found: kind_name(value).into(),
            });
        }
        Ok(serde_json::from_value(value.clone())?)
    }

    /// Whether the prop `name` was supplied.
    pub fn has_prop(&self, name: &str) -> bool {
        self.props.contains_key(name)
    }
}

/// Whether `value` looks like a component instance: an object with a string
/// `type` and either `props` or `children`.
pub fn looks_like_instance(value: &Value) -> bool {
    value.get("type").map_or(false, Value::is_string)
        && (value.get("props").is_some() || value.get("children").is_some())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_nested_children_and_text() {
        let instance = ComponentInstance::from_value(&json!({
            "type": "list",
            "props": {"ordered": true},
            "children": [
                {"type": "item", "props": {"label": "a"}},
                "loose text"
            ],
            "slots": {"header": {"type": "title"}}
        }))
        .unwrap();
        assert_eq!(instance.type_name, "list");
        assert_eq!(instance.children.len(), 2);
        assert_eq!(instance.children[0].type_name(), "item");
        assert_eq!(instance.children[1].type_name(), "#text");
        assert!(instance.slots.contains_key("header"));
    }

    #[test]
    fn rejects_non_objects() {
        let err = ComponentInstance::from_value(&json!([1, 2])).unwrap_err();
        assert!(matches!(err, VigilError::Shape { .. }));
    }

    #[test]
    fn rejects_missing_type() {
        assert!(ComponentInstance::from_value(&json!({"props": {}})).is_err());
    }

    #[test]
    fn instance_detection() {
        assert!(looks_like_instance(&json!({"type": "button", "props": {}})));
        assert!(looks_like_instance(&json!({"type": "list", "children": []})));
        assert!(!looks_like_instance(&json!({"type": "form", "fields": []})));
        assert!(!looks_like_instance(&json!("button")));
    }
}
