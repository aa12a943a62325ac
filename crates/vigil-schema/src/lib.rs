//! # vigil-schema: Schema Definition Validation
//!
//! Validates form, field, and theme schema documents with a list of
//! independently pluggable rules grouped by [`SchemaCategory`].
//!
//! ## Flow
//!
//! 1. [`SchemaDocument::classify`] recognises the value's shape and decodes
//!    it into a typed view.
//! 2. Every enabled [`SchemaRule`] runs against the classified document with
//!    a path-tracking [`SchemaContext`].
//! 3. The per-rule [`SchemaReport`]s are merged and, at the engine
//!    boundary, converted into a [`vigil_core::ValidationResult`].
//!
//! An unrecognised shape produces an empty, valid report. A recognised but
//! undecodable value is reported once, by the structure rule for its kind.

pub mod document;
pub mod report;
pub mod rules;
pub mod validator;

pub use document::{
    DocumentKind, FieldSchema, FieldValidation, FormSchema, SchemaDocument, ThemeSchema,
    FIELD_TYPES,
};
pub use report::{SchemaCategory, SchemaError, SchemaReport, SchemaSuggestion, SchemaWarning};
pub use rules::{SchemaContext, SchemaRuleValidator};
pub use validator::{SchemaRule, SchemaValidator, SCHEMA_RULE_ID};
