//! # Component Schemas
//!
//! Declarative descriptions of what a component accepts. Schemas are
//! registered once and looked up by type name for every validated instance.
//!
//! Prop, property, slot, and variant tables are [`IndexMap`]s so that
//! iteration follows declaration order. Variant matching in particular is
//! first-match-wins and must be deterministic.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// PropKind / PropType
// ---------------------------------------------------------------------------

/// The closed set of prop kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropKind {
    /// A string.
    String,
    /// A number, or a string that parses as one.
    Number,
    /// A boolean.
    Boolean,
    /// A sequence; elements are checked against `element_type` if declared.
    Array,
    /// A mapping; declared properties are checked recursively.
    Object,
    /// A callable marker (`{"$fn": "name"}`).
    Function,
    /// A nested component instance: an object with a string `type`.
    Component,
    /// Passes if any member type passes.
    Union,
    /// Passes if the value equals one of the literals.
    Enum,
    /// Always passes.
    Any,
}

impl PropKind {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Function => "function",
            Self::Component => "component",
            Self::Union => "union",
            Self::Enum => "enum",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for PropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type descriptor. Nested descriptors are only meaningful for the kinds
/// that use them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PropType {
    /// The kind.
    pub kind: PropKind,
    /// Element type, for `array`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub element_type: Option<Box<PropType>>,
    /// Declared property types, for `object`.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub properties: IndexMap<String, PropType>,
    /// Member types, for `union`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub union: Vec<PropType>,
    /// Allowed literals, for `enum`.
    #[serde(default, rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub literals: Vec<Value>,
}

impl PropType {
    /// A bare descriptor of `kind`.
    pub fn of(kind: PropKind) -> Self {
        Self {
            kind,
            element_type: None,
            properties: IndexMap::new(),
            union: Vec::new(),
            literals: Vec::new(),
        }
    }

    /// `string`.
    pub fn string() -> Self {
        Self::of(PropKind::String)
    }

    /// `number`.
    pub fn number() -> Self {
        Self::of(PropKind::Number)
    }

    /// `boolean`.
    pub fn boolean() -> Self {
        Self::of(PropKind::Boolean)
    }

    /// `function`.
    pub fn function() -> Self {
        Self::of(PropKind::Function)
    }

    /// `component`.
    pub fn component() -> Self {
        Self::of(PropKind::Component)
    }

    /// `any`.
    pub fn any() -> Self {
        Self::of(PropKind::Any)
    }

    /// `array` without an element type.
    pub fn array() -> Self {
        Self::of(PropKind::Array)
    }

    /// `array` whose elements must be `element`.
    pub fn array_of(element: PropType) -> Self {
        Self {
            element_type: Some(Box::new(element)),
            ..Self::of(PropKind::Array)
        }
    }

    /// `object` with declared property types.
    pub fn object_with<I, K>(properties: I) -> Self
    where
        I: IntoIterator<Item = (K, PropType)>,
        K: Into<String>,
    {
        Self {
            properties: properties.into_iter().map(|(k, v)| (k.into(), v)).collect(),
            ..Self::of(PropKind::Object)
        }
    }

    /// `union` of `members`.
    pub fn union(members: Vec<PropType>) -> Self {
        Self {
            union: members,
            ..Self::of(PropKind::Union)
        }
    }

    /// `enum` over `literals`.
    pub fn enumeration(literals: Vec<Value>) -> Self {
        Self {
            literals,
            ..Self::of(PropKind::Enum)
        }
    }
}

// ---------------------------------------------------------------------------
// PropSchema
// ---------------------------------------------------------------------------

/// Value constraints checked after the type check.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PropConstraints {
    /// Minimum string length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum string length in characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the string must match (unanchored).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One declared prop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PropSchema {
    /// Declared type.
    #[serde(rename = "type")]
    pub prop_type: PropType,
    /// Must be present.
    #[serde(default)]
    pub required: bool,
    /// Default value, informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Supplying it yields a warning.
    #[serde(default)]
    pub deprecated: bool,
    /// Value constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<PropConstraints>,
    /// Props that must be present when this one is.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Props that must be absent when this one is present.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,
}

impl PropSchema {
    /// An optional prop of type `prop_type`.
    pub fn new(prop_type: PropType) -> Self {
        Self {
            prop_type,
            required: false,
            default: None,
            description: String::new(),
            deprecated: false,
            validation: None,
            dependencies: Vec::new(),
            conflicts: Vec::new(),
        }
    }

    /// Mark as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Mark as deprecated.
    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Set the default value.
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Attach constraints.
    pub fn with_constraints(mut self, constraints: PropConstraints) -> Self {
        self.validation = Some(constraints);
        self
    }

    /// Require `prop` to co-occur.
    pub fn depends_on(mut self, prop: impl Into<String>) -> Self {
        self.dependencies.push(prop.into());
        self
    }

    /// Forbid `prop` from co-occurring.
    pub fn conflicts_with(mut self, prop: impl Into<String>) -> Self {
        self.conflicts.push(prop.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Children / Composition / Variants
// ---------------------------------------------------------------------------

fn default_true() -> bool {
    true
}

/// Constraints on an instance's children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ChildrenSchema {
    /// At least one child is required.
    #[serde(default)]
    pub required: bool,
    /// Allowed child component types. Empty allows any.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Minimum number of children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_count: Option<usize>,
    /// Maximum number of children.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_count: Option<usize>,
    /// Whether text children are accepted.
    #[serde(default = "default_true")]
    pub allow_text: bool,
}

impl Default for ChildrenSchema {
    fn default() -> Self {
        Self {
            required: false,
            types: Vec::new(),
            min_count: None,
            max_count: None,
            allow_text: true,
        }
    }
}

/// A named composition slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct SlotSchema {
    /// Slot content must be present and non-empty.
    pub required: bool,
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Allowed component types for slot content. Empty allows any.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
}

/// Render-prop contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct RenderSchema {
    /// The instance must supply a callable `render` prop.
    pub required: bool,
    /// Parameters passed to the render function. Documented only; a
    /// callable marker carries no signature to check against.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub parameters: IndexMap<String, PropSchema>,
}

/// How an instance may be composed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct CompositionSchema {
    /// Named slots, in declaration order.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub slots: IndexMap<String, SlotSchema>,
    /// Render-prop contract.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render: Option<RenderSchema>,
    /// Accepts an `as` prop to render as a different element.
    pub polymorphic: bool,
    /// Accepts an `asChild` prop to render through its child.
    pub as_child: bool,
}

/// A named configuration of a component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct VariantSchema {
    /// Description.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Additional props validated when the variant matches.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub props: IndexMap<String, PropSchema>,
    /// Props whose presence selects this variant.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    /// Props whose presence rules this variant out.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub forbidden: Vec<String>,
}

impl VariantSchema {
    /// An empty variant.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prop that selects this variant.
    pub fn requires(mut self, prop: impl Into<String>) -> Self {
        self.required.push(prop.into());
        self
    }

    /// Add a prop that rules this variant out.
    pub fn forbids(mut self, prop: impl Into<String>) -> Self {
        self.forbidden.push(prop.into());
        self
    }

    /// Add an extra prop validated when the variant matches.
    pub fn prop(mut self, name: impl Into<String>, schema: PropSchema) -> Self {
        self.props.insert(name.into(), schema);
        self
    }
}

// ---------------------------------------------------------------------------
// ComponentSchema
// ---------------------------------------------------------------------------

/// The full schema of one component type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ComponentSchema {
    /// Type name instances refer to.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Declared props, in declaration order.
    #[serde(default)]
    pub props: IndexMap<String, PropSchema>,
    /// Children constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildrenSchema>,
    /// Composition constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub composition: Option<CompositionSchema>,
    /// Variants, in registration order.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub variants: IndexMap<String, VariantSchema>,
}

impl ComponentSchema {
    /// An empty schema for `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Declare a prop.
    pub fn prop(mut self, name: impl Into<String>, schema: PropSchema) -> Self {
        self.props.insert(name.into(), schema);
        self
    }

    /// Set children constraints.
    pub fn children(mut self, children: ChildrenSchema) -> Self {
        self.children = Some(children);
        self
    }

    /// Set composition constraints.
    pub fn composition(mut self, composition: CompositionSchema) -> Self {
        self.composition = Some(composition);
        self
    }

    /// Register a variant. Later registrations of the same name replace the
    /// earlier one in place.
    pub fn variant(mut self, name: impl Into<String>, variant: VariantSchema) -> Self {
        self.variants.insert(name.into(), variant);
        self
    }
}
