//! # Token Flattening and Formats
//!
//! A theme's `tokens` object is flattened into dotted keys:
//!
//! ```text
//! {"colors": {"primary": "#0af", "text": {"value": "#111"}}}
//!   -> colors.primary = "#0af"
//!      colors.text    = "#111"
//! ```
//!
//! An object with a `value` key is a leaf; any other object is a group.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use vigil_core::value::display_scalar;

/// Flattened tokens in key order.
pub type TokenMap = BTreeMap<String, Value>;

/// Flatten `theme.tokens`. A missing or non-object `tokens` yields nothing.
pub fn flatten_tokens(theme: &Value) -> TokenMap {
    let mut out = TokenMap::new();
    if let Some(Value::Object(tokens)) = theme.get("tokens") {
        flatten_into(tokens, "", &mut out);
    }
    out
}

fn flatten_into(map: &Map<String, Value>, prefix: &str, out: &mut TokenMap) {
    for (key, value) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match value {
            Value::Object(inner) => match inner.get("value") {
                Some(leaf) => {
                    out.insert(full, leaf.clone());
                }
                None => flatten_into(inner, &full, out),
            },
            leaf => {
                out.insert(full, leaf.clone());
            }
        }
    }
}

/// What a token's value is expected to look like, judged from its name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenFormat {
    /// Hex, `rgb(`, `hsl(`, or `oklch(`.
    Color,
    /// Length with a `px`/`rem`/`em`/`%` unit.
    Spacing,
    /// Length with a `px`/`rem`/`em`/`%` unit.
    FontSize,
    /// Anything goes.
    Free,
}

impl TokenFormat {
    /// Format implied by a token name.
    pub fn for_token(name: &str) -> Self {
        let lower = name.to_ascii_lowercase();
        if lower.contains("color") {
            Self::Color
        } else if lower.contains("spacing") {
            Self::Spacing
        } else if lower.contains("font-size") {
            Self::FontSize
        } else {
            Self::Free
        }
    }

    /// Whether `value` matches the format. Unknown formats always match.
    pub fn accepts(&self, value: &Value) -> bool {
        let text = display_scalar(value);
        let pattern = match self {
            Self::Color => color_pattern(),
            Self::Spacing | Self::FontSize => length_pattern(),
            Self::Free => return true,
        };
        pattern.map_or(true, |re| re.is_match(&text))
    }
}

fn compiled(cell: &'static OnceLock<Option<Regex>>, pattern: &str) -> Option<&'static Regex> {
    cell.get_or_init(|| Regex::new(pattern).ok()).as_ref()
}

fn color_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, r"^#([A-Fa-f0-9]{6}|[A-Fa-f0-9]{3})$|^rgb\(|^hsl\(|^oklch\(")
}

fn length_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, r"^\d+(\.\d+)?(px|rem|em|%)$")
}

fn name_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    compiled(&CELL, r"^[a-z][a-z0-9]*(-[a-z0-9]+)*(\.[a-z][a-z0-9]*(-[a-z0-9]+)*)*$")
}

/// Whether a flattened token name is kebab-case segments joined by dots.
pub fn is_valid_token_name(name: &str) -> bool {
    name_pattern().map_or(true, |re| re.is_match(name))
}

/// Whether a string value looks like a color literal.
pub fn is_color_value(value: &str) -> bool {
    color_pattern().map_or(false, |re| re.is_match(value))
}
