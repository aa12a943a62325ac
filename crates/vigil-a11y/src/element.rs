//! # Element Trees
//!
//! The accessibility rules inspect a UI tree given as JSON. An element is
//! any object with a string `type`; its `props` and `style` objects are
//! optional. The tree is walked depth-first through `children` and
//! `components` arrays, and every element visited counts towards
//! `elements_checked`.

use serde_json::{Map, Value};
use vigil_core::value::as_number;

/// One element of the tree, with its position.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    /// The element object.
    pub value: &'a Map<String, Value>,
    /// Its `type`.
    pub type_name: &'a str,
    /// Distance from the root; the root element is depth 0.
    pub depth: usize,
    /// Index into the flattened tree; used to build paths lazily.
    pub index: usize,
}

impl<'a> Element<'a> {
    /// The `props` object, if any.
    pub fn props(&self) -> Option<&'a Map<String, Value>> {
        self.value.get("props").and_then(Value::as_object)
    }

    /// A prop value.
    pub fn prop(&self, name: &str) -> Option<&'a Value> {
        self.props().and_then(|props| props.get(name))
    }

    /// A prop as a string.
    pub fn prop_str(&self, name: &str) -> Option<&'a str> {
        self.prop(name).and_then(Value::as_str)
    }

    /// Whether the prop is present.
    pub fn has_prop(&self, name: &str) -> bool {
        self.prop(name).is_some()
    }

    /// A non-empty string prop, trimmed.
    pub fn non_empty_prop(&self, name: &str) -> Option<&'a str> {
        self.prop_str(name).map(str::trim).filter(|s| !s.is_empty())
    }

    /// A `style` entry as a string or number.
    pub fn style(&self, key: &str) -> Option<&'a Value> {
        self.value
            .get("style")
            .and_then(Value::as_object)
            .and_then(|style| style.get(key))
    }

    /// A `style` entry as a string.
    pub fn style_str(&self, key: &str) -> Option<&'a str> {
        self.style(key).and_then(Value::as_str)
    }

    /// Text nodes directly under this element: string entries of `children`
    /// and a string `props.children`.
    pub fn text_content(&self) -> String {
        let mut text = String::new();
        if let Some(Value::Array(children)) = self.value.get("children") {
            for child in children {
                if let Value::String(s) = child {
                    text.push_str(s);
                }
            }
        }
        if let Some(s) = self.prop_str("children") {
            text.push_str(s);
        }
        for key in ["text", "content"] {
            if let Some(s) = self.value.get(key).and_then(Value::as_str) {
                text.push_str(s);
            }
        }
        text
    }

    /// `tabindex` / `tabIndex` as a number, accepting numeric strings.
    pub fn tab_index(&self) -> Option<f64> {
        self.prop("tabindex")
            .or_else(|| self.prop("tabIndex"))
            .and_then(as_number)
    }

    /// Short human description: `"image element"`, `"button#save element"`.
    pub fn describe(&self) -> String {
        match self.prop_str("id") {
            Some(id) => format!("{}#{id} element", self.type_name),
            None => format!("{} element", self.type_name),
        }
    }
}

/// A flattened element tree in depth-first order, with paths.
#[derive(Debug, Clone, Default)]
pub struct ElementTree<'a> {
    elements: Vec<Element<'a>>,
    paths: Vec<String>,
}

impl<'a> ElementTree<'a> {
    /// Walk `root`. Non-object roots and objects without a `type` are
    /// traversed but not counted.
    pub fn build(root: &'a Value) -> Self {
        let mut tree = Self::default();
        tree.walk(root, "$".to_string(), 0);
        tree
    }

    fn walk(&mut self, value: &'a Value, path: String, depth: usize) {
        match value {
            Value::Array(items) => {
                for (i, item) in items.iter().enumerate() {
                    self.walk(item, format!("{path}[{i}]"), depth);
                }
            }
            Value::Object(map) => {
                let mut child_depth = depth;
                if let Some(type_name) = map.get("type").and_then(Value::as_str) {
                    self.elements.push(Element {
                        value: map,
                        type_name,
                        depth,
                        index: self.elements.len(),
                    });
                    self.paths.push(path.clone());
                    child_depth = depth + 1;
                }
                for key in ["children", "components"] {
                    if let Some(nested @ Value::Array(_)) = map.get(key) {
                        self.walk(nested, format!("{path}.{key}"), child_depth);
                    }
                }
            }
            _ => {}
        }
    }

    /// Elements in depth-first order.
    pub fn elements(&self) -> &[Element<'a>] {
        &self.elements
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tree has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The root element, if the walk found one at depth 0.
    pub fn root(&self) -> Option<&Element<'a>> {
        self.elements.first().filter(|e| e.depth == 0)
    }

    /// Path of `element`, e.g. `$.children[2]`.
    pub fn path(&self, element: &Element<'_>) -> &str {
        self.paths.get(element.index).map_or("$", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn walks_children_and_components() {
        let value = json!({
            "type": "page",
            "children": [
                {"type": "header", "children": [{"type": "image"}, "Logo"]},
                "text node"
            ],
            "components": [{"type": "button", "props": {"id": "go"}}]
        });
        let tree = ElementTree::build(&value);
        let types: Vec<_> = tree.elements().iter().map(|e| e.type_name).collect();
        assert_eq!(types, vec!["page", "header", "image", "button"]);

        let image = &tree.elements()[2];
        assert_eq!(image.depth, 2);
        assert_eq!(tree.path(image), "$.children[0].children[0]");
        assert_eq!(tree.elements()[3].describe(), "button#go element");
        assert_eq!(tree.elements()[1].text_content(), "Logo");
        assert_eq!(tree.root().map(|e| e.type_name), Some("page"));
    }

    #[test]
    fn untyped_containers_are_traversed_but_not_counted() {
        let value = json!({"components": [{"type": "a"}, {"type": "b"}]});
        let tree = ElementTree::build(&value);
        assert_eq!(tree.len(), 2);
        assert!(tree.root().is_some());
        assert_eq!(tree.path(&tree.elements()[1]), "$.components[1]");
    }

    #[test]
    fn scalars_have_no_elements() {
        assert!(ElementTree::build(&json!("button")).is_empty());
        assert!(ElementTree::build(&json!(null)).is_empty());
    }

    #[test]
    fn tab_index_accepts_numeric_strings() {
        let value = json!({"type": "div", "props": {"tabIndex": "0"}});
        let tree = ElementTree::build(&value);
        assert_eq!(tree.elements()[0].tab_index(), Some(0.0));
    }
}
