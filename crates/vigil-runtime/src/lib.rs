//! # vigil-runtime: Runtime Input Validation
//!
//! Checks data submitted at runtime, as opposed to authored schemas and
//! component trees. Input checks cover field formats (`email`, `phone`);
//! form checks add required fields and the CSRF token length. Both return
//! a sanitized copy of the data next to the result: HTML-escaped, stripped
//! of SQL statement patterns and, for forms, with sensitive fields redacted.

pub mod config;
pub mod sanitize;
pub mod validator;

pub use config::RuntimeConfig;
pub use sanitize::{escape_html, strip_sql_patterns, Sanitizer, REDACTED};
pub use validator::{RuntimeOutcome, RuntimeValidator, RUNTIME_RULE_ID};
