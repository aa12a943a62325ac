//! # vigil-core: Foundational Types for the Validation Engine
//!
//! Every other `vigil-*` crate depends on this one; it depends on nothing
//! internal. It defines the uniform result model that all validators produce
//! and the capability trait through which new rules are plugged in.
//!
//! ## Key Design Principles
//!
//! 1. **One result type.** Component, schema, runtime, accessibility,
//!    performance, and theme validation all report through
//!    [`ValidationResult`]. Errors invalidate, warnings never do.
//!
//! 2. **Associative merge.** [`ValidationResult::merge`] appends findings and
//!    ANDs validity, so the order in which rules run changes only the order of
//!    findings, never the verdict.
//!
//! 3. **Subjects are `serde_json::Value`.** Collaborators hand over
//!    already-parsed values. Validators inspect their shape at runtime and
//!    treat an unrelated shape as a no-op.
//!
//! 4. **Typed sub-reports.** The accessibility, performance, and theme report
//!    models live here so that [`ValidationResult`] can embed them without
//!    the core depending on the validators that produce them.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `vigil-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.
//! - All public types derive `Debug`, `Clone`, and implement `Serialize`/`Deserialize`.

#![deny(missing_docs)]

pub mod a11y;
pub mod context;
pub mod error;
pub mod performance;
pub mod result;
pub mod rule;
pub mod theme;
pub mod value;

// Re-export primary types for ergonomic imports.
pub use context::{ValidationContext, ValidationLevel, ValidationOptions, ValidationSource};
pub use error::{VigilError, VigilResult};
pub use result::{SourceLocation, ValidationError, ValidationResult, ValidationWarning};
pub use rule::{RuleCategory, ValidationRule, Validator};
