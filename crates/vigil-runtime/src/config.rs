//! Runtime validator configuration.

use serde::{Deserialize, Serialize};

/// Settings for [`RuntimeValidator`](crate::RuntimeValidator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct RuntimeConfig {
    /// Produce a sanitized copy of validated data.
    pub sanitize: bool,
    /// Strip SQL statement patterns while sanitizing.
    pub strip_sql: bool,
    /// Replace sensitive form fields with a placeholder while sanitizing.
    pub redact_sensitive: bool,
    /// Substrings that mark a field name as sensitive, matched case-insensitively.
    pub sensitive_markers: Vec<String>,
    /// Fields every submitted form must carry.
    pub required_form_fields: Vec<String>,
    /// Minimum CSRF token length in characters.
    pub min_csrf_token_length: usize,
    /// Minimum phone number length in characters.
    pub min_phone_length: usize,
    /// Maximum phone number length in characters.
    pub max_phone_length: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            sanitize: true,
            strip_sql: true,
            redact_sensitive: true,
            sensitive_markers: ["password", "token", "secret", "key", "auth"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            required_form_fields: vec!["csrf_token".to_string()],
            min_csrf_token_length: 32,
            min_phone_length: 10,
            max_phone_length: 15,
        }
    }
}
