//! # Validation Context
//!
//! A [`ValidationContext`] is constructed once per validation call and handed
//! to every dispatched validator. Derivatives (`with_component`,
//! `with_level`, ...) return modified copies; the original is never mutated.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// ValidationLevel
// ---------------------------------------------------------------------------

/// How strictly a validation call is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationLevel {
    /// Report findings but treat the call as advisory.
    Warn,
    /// Default: errors invalidate, warnings are advisory.
    Error,
    /// Strict mode requested by the caller.
    Strict,
}

impl ValidationLevel {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Warn => "warn",
            Self::Error => "error",
            Self::Strict => "strict",
        }
    }
}

impl Default for ValidationLevel {
    fn default() -> Self {
        Self::Error
    }
}

impl fmt::Display for ValidationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValidationSource
// ---------------------------------------------------------------------------

/// Which entry point produced the validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationSource {
    /// A UI component instance.
    Component,
    /// A form, field, or theme schema definition.
    Schema,
    /// Runtime data.
    Runtime,
    /// A test-harness invocation.
    Test,
}

impl ValidationSource {
    /// Return the canonical string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Component => "component",
            Self::Schema => "schema",
            Self::Runtime => "runtime",
            Self::Test => "test",
        }
    }
}

impl fmt::Display for ValidationSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ValidationOptions
// ---------------------------------------------------------------------------

/// Options bundle carried by every context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "snake_case")]
pub struct ValidationOptions {
    /// Run in strict mode.
    pub strict_mode: bool,
    /// Drop warnings from the final result.
    pub skip_warnings: bool,
    /// Run the accessibility validator after rule dispatch.
    pub enable_accessibility: bool,
    /// Run the performance validator after rule dispatch.
    pub enable_performance: bool,
    /// Run the theme validator after rule dispatch.
    pub enable_theme: bool,
    /// When non-empty, only these rule ids are dispatched.
    pub include_rules: Vec<String>,
    /// Rule ids that are never dispatched.
    pub exclude_rules: Vec<String>,
    /// Caller deadline in milliseconds. Recorded, not polled mid-loop.
    pub timeout_ms: Option<u64>,
}

impl ValidationOptions {
    /// Whether the rule with `id` passes the include/exclude filters.
    ///
    /// Exclusion wins over inclusion.
    pub fn allows_rule(&self, id: &str) -> bool {
        if self.exclude_rules.iter().any(|r| r == id) {
            return false;
        }
        self.include_rules.is_empty() || self.include_rules.iter().any(|r| r == id)
    }
}

// ---------------------------------------------------------------------------
// ValidationContext
// ---------------------------------------------------------------------------

/// Per-call validation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationContext {
    /// Evaluation level.
    pub level: ValidationLevel,
    /// Entry point that produced this call.
    pub source: ValidationSource,
    /// Declared component type name, when validating a component.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    /// Free-form caller metadata.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub metadata: BTreeMap<String, Value>,
    /// Options bundle.
    #[serde(default)]
    pub options: ValidationOptions,
}

impl ValidationContext {
    /// Create a context with default options.
    pub fn new(level: ValidationLevel, source: ValidationSource) -> Self {
        Self {
            level,
            source,
            component: None,
            metadata: BTreeMap::new(),
            options: ValidationOptions::default(),
        }
    }

    /// Copy of this context scoped to a component type.
    pub fn with_component(&self, component: impl Into<String>) -> Self {
        Self {
            component: Some(component.into()),
            ..self.clone()
        }
    }

    /// Copy of this context at a different level.
    pub fn with_level(&self, level: ValidationLevel) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// Copy of this context with different options.
    pub fn with_options(&self, options: ValidationOptions) -> Self {
        Self {
            options,
            ..self.clone()
        }
    }

    /// Copy of this context with one additional metadata entry.
    pub fn with_metadata(&self, key: impl Into<String>, value: Value) -> Self {
        let mut next = self.clone();
        next.metadata.insert(key.into(), value);
        next
    }

    /// Whether the context asks for strict evaluation.
    pub fn is_strict(&self) -> bool {
        self.level == ValidationLevel::Strict || self.options.strict_mode
    }
}
