//! # Schema Documents
//!
//! Typed views over the three schema shapes the built-in rules understand,
//! and the classifier that picks one for an incoming value.
//!
//! ## Classification
//!
//! | Shape | Recognised by |
//! |-------|---------------|
//! | Theme | a `tokens` key, or `kind == "theme"` |
//! | Form  | a `fields` key, or `type == "form"` |
//! | Field | string `name` and string `type` |
//!
//! A value matching none of these is [`SchemaDocument::Other`] and every
//! built-in rule ignores it. A value that is recognised but fails to decode
//! into its typed view is [`SchemaDocument::Malformed`]; only the structure
//! rule for that kind reports it.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::report::SchemaCategory;

/// Field types a form field may declare.
pub const FIELD_TYPES: &[&str] = &[
    "text", "email", "password", "number", "date", "select", "checkbox", "textarea", "file",
];

/// Declared validation of a form field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldValidation {
    /// Minimum input length.
    #[serde(alias = "min_length", skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    /// Maximum input length.
    #[serde(alias = "max_length", skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    /// Minimum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum numeric value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression the input must match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// One field of a form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSchema {
    /// Field name, unique within the form.
    pub name: String,
    /// Field type, one of [`FIELD_TYPES`].
    #[serde(rename = "type")]
    pub field_type: String,
    /// Display label.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub label: String,
    /// Whether input is mandatory.
    pub required: bool,
    /// Input validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<FieldValidation>,
}

/// A form definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FormSchema {
    /// Form id.
    pub id: String,
    /// Schema type, e.g. `form`.
    #[serde(rename = "type")]
    pub schema_type: String,
    /// Display title.
    pub title: String,
    /// Fields, in display order.
    pub fields: Vec<FieldSchema>,
}

/// A theme definition as seen by the schema rules. Token contents are left
/// untyped; the theme validator inspects them in depth.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSchema {
    /// Theme name.
    pub name: String,
    /// Theme version.
    pub version: String,
    /// Token groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens: Option<Map<String, Value>>,
}

impl ThemeSchema {
    /// Whether a `semantic` token group is present.
    pub fn has_semantic_tokens(&self) -> bool {
        self.tokens
            .as_ref()
            .map_or(false, |tokens| tokens.contains_key("semantic"))
    }
}

/// The kind a value was recognised as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// A form.
    Form,
    /// A standalone field.
    Field,
    /// A theme.
    Theme,
}

impl DocumentKind {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Form => "form",
            Self::Field => "field",
            Self::Theme => "theme",
        }
    }

    /// The rule category this kind belongs to.
    pub fn category(&self) -> SchemaCategory {
        match self {
            Self::Form => SchemaCategory::Form,
            Self::Field => SchemaCategory::Field,
            Self::Theme => SchemaCategory::Theme,
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified schema value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaDocument {
    /// A form definition.
    Form(FormSchema),
    /// A standalone field definition.
    Field(FieldSchema),
    /// A theme definition.
    Theme(ThemeSchema),
    /// Recognised as `kind` but not decodable.
    Malformed {
        /// What the value looked like.
        kind: DocumentKind,
        /// Decoder message.
        reason: String,
    },
    /// Not a schema any built-in rule handles.
    Other,
}

impl SchemaDocument {
    /// Classify and decode `value`.
    pub fn classify(value: &Value) -> Self {
        let Some(kind) = recognise(value) else {
            return Self::Other;
        };
        let decoded = match kind {
            DocumentKind::Theme => serde_json::from_value(value.clone()).map(Self::Theme),
            DocumentKind::Form => serde_json::from_value(value.clone()).map(Self::Form),
            DocumentKind::Field => serde_json::from_value(value.clone()).map(Self::Field),
        };
        decoded.unwrap_or_else(|e| Self::Malformed {
            kind,
            reason: e.to_string(),
        })
    }

    /// The recognised kind, if any.
    pub fn kind(&self) -> Option<DocumentKind> {
        match self {
            Self::Form(_) => Some(DocumentKind::Form),
            Self::Field(_) => Some(DocumentKind::Field),
            Self::Theme(_) => Some(DocumentKind::Theme),
            Self::Malformed { kind, .. } => Some(*kind),
            Self::Other => None,
        }
    }
}

fn recognise(value: &Value) -> Option<DocumentKind> {
    let map = value.as_object()?;
    let str_field = |key: &str| map.get(key).and_then(Value::as_str);

    if map.contains_key("tokens") || str_field("kind") == Some("theme") {
        Some(DocumentKind::Theme)
    } else if map.contains_key("fields") || str_field("type") == Some("form") {
        Some(DocumentKind::Form)
    } else if str_field("name").is_some() && str_field("type").is_some() {
        Some(DocumentKind::Field)
    } else {
        None
    }
}
