//! # vigil-engine: Rule Registry and Dispatch
//!
//! Ties the validators together. [`ValidationEngine`] owns an ordered
//! registry of rules, each a [`vigil_core::ValidationRule`] paired with a
//! [`vigil_core::Validator`], and dispatches a value to every applicable
//! rule. [`ValidationSuite`] runs the engine and the specialised validators
//! over one value and reports a single verdict and score.
//!
//! ## Dispatch
//!
//! ```text
//! for rule in registry (registration order):
//!     skip if disabled, excluded, or not in a non-empty include list
//!     result.merge(rule.validator.validate(ctx, value))
//! if options.enable_accessibility: merge accessibility report
//! if options.enable_performance:   merge performance report
//! if options.enable_theme:         merge theme report
//! ```
//!
//! ## Observability
//!
//! Each call runs inside a `validation` span carrying `source` and `level`.
//! The `metrics` facade receives `vigil_validations_total{source}`,
//! `vigil_rule_failures_total{rule}`, and
//! `vigil_validation_duration_seconds`. Without an installed recorder these
//! are no-ops.

pub mod config;
pub mod engine;
pub mod error;
pub mod report;
pub mod suite;

pub use config::{EngineConfig, SuiteConfig};
pub use engine::{RegisteredRule, ValidationEngine};
pub use error::EngineError;
pub use report::{RuleStats, ValidationReport};
pub use suite::{ComprehensiveReport, ValidationSuite};
