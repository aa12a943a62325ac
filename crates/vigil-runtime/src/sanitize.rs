//! # Input Sanitization
//!
//! String leaves are HTML-escaped and then stripped of SQL statement
//! patterns: quotes, comment markers, `xp_`/`sp_` procedure prefixes, and
//! statement keywords as whole words in any case. Stripping repeats until
//! nothing matches, so removing one pattern cannot splice another together.
//!
//! Object keys are never rewritten. Form sanitization additionally replaces
//! the value of every top-level field whose name contains a sensitive
//! marker with [`REDACTED`].

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::config::RuntimeConfig;

/// Placeholder written over sensitive form fields.
pub const REDACTED: &str = "[REDACTED]";

fn sql_pattern() -> Option<&'static Regex> {
    static CELL: OnceLock<Option<Regex>> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(
            r"(?i)'|--|/\*|\*/|\b(?:xp|sp)_|\b(?:union|select|insert|update|delete|drop|create|alter|exec)\b",
        )
        .ok()
    })
    .as_ref()
}

/// Escape `& < > ' "` as HTML entities.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\'' => out.push_str("&#39;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
    out
}

/// Remove SQL statement patterns from `input`.
pub fn strip_sql_patterns(input: &str) -> String {
    let Some(re) = sql_pattern() else {
        return input.to_string();
    };
    let mut current = input.to_string();
    while re.is_match(&current) {
        current = re.replace_all(&current, "").into_owned();
    }
    current
}

/// Applies the configured sanitization to JSON values.
#[derive(Debug, Clone)]
pub struct Sanitizer {
    strip_sql: bool,
    redact: bool,
    markers: Vec<String>,
}

impl Sanitizer {
    /// A sanitizer following `config`.
    pub fn new(config: &RuntimeConfig) -> Self {
        Self {
            strip_sql: config.strip_sql,
            redact: config.redact_sensitive,
            markers: config.sensitive_markers.iter().map(|m| m.to_lowercase()).collect(),
        }
    }

    /// Sanitize one string.
    pub fn clean(&self, input: &str) -> String {
        let escaped = escape_html(input);
        if self.strip_sql {
            strip_sql_patterns(&escaped)
        } else {
            escaped
        }
    }

    /// Sanitize every string leaf of `value`.
    pub fn sanitize(&self, value: &Value) -> Value {
        match value {
            Value::String(s) => Value::String(self.clean(s)),
            Value::Array(items) => Value::Array(items.iter().map(|v| self.sanitize(v)).collect()),
            Value::Object(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), self.sanitize(v)))
                    .collect(),
            ),
            other => other.clone(),
        }
    }

    /// Whether `field` names a sensitive value.
    pub fn is_sensitive(&self, field: &str) -> bool {
        let field = field.to_lowercase();
        self.markers.iter().any(|m| field.contains(m.as_str()))
    }

    /// Sanitize a form, redacting sensitive fields when configured to.
    pub fn sanitize_form(&self, form: &Map<String, Value>) -> Map<String, Value> {
        form.iter()
            .map(|(k, v)| {
                let clean = if self.redact && self.is_sensitive(k) {
                    Value::String(REDACTED.to_string())
                } else {
                    self.sanitize(v)
                };
                (k.clone(), clean)
            })
            .collect()
    }
}
