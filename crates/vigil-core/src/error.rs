//! # Error Types: Structured Error Hierarchy
//!
//! Infrastructure errors for the validation engine. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Findings about the validated subject are never `Err`. They are
//!   [`ValidationError`](crate::ValidationError) entries inside a result.
//! - `VigilError` is reserved for helpers that can genuinely fail: parsing a
//!   color literal, compiling a pattern, decoding a typed shape. Validators
//!   convert these into findings before returning.

use thiserror::Error;

/// Top-level error type for the validation engine.
#[derive(Error, Debug)]
pub enum VigilError {
    /// A color literal could not be parsed.
    #[error("invalid color literal: {input:?}")]
    InvalidColor {
        /// The literal as supplied.
        input: String,
    },

    /// A constraint pattern failed to compile.
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The pattern source.
        pattern: String,
        /// Compiler diagnostic.
        reason: String,
    },

    /// A value did not have the shape a typed decoder expected.
    #[error("shape mismatch: expected {expected}, found {found}")]
    Shape {
        /// Description of the expected shape.
        expected: String,
        /// Runtime kind that was found instead.
        found: String,
    },

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Convenience alias used by fallible helpers across the workspace.
pub type VigilResult<T> = Result<T, VigilError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_color_display() {
        let err = VigilError::InvalidColor {
            input: "#zzz".into(),
        };
        assert_eq!(format!("{err}"), "invalid color literal: \"#zzz\"");
    }

    #[test]
    fn shape_display() {
        let err = VigilError::Shape {
            expected: "object".into(),
            found: "array".into(),
        };
        assert!(format!("{err}").contains("expected object, found array"));
    }

    #[test]
    fn serde_error_converts() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{not json");
        let err: VigilError = parse.unwrap_err().into();
        assert!(matches!(err, VigilError::Serialization(_)));
    }
}
