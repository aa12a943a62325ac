//! # vigil-cli: Vigil Command-Line Interface
//!
//! Reads subjects from JSON or YAML files, runs the requested validator,
//! and prints the result.
//!
//! ## Subcommands
//!
//! - `component`: component instance against schemas from a file
//! - `schema`: form, field, or theme schema document
//! - `a11y`: accessibility checks at a conformance level
//! - `perf`: performance budgets and composite grade
//! - `theme`: design token checks
//! - `runtime`: submitted data, or a form with `--form`
//! - `all`: every applicable validator, one verdict
//! - `rules`: registered rules and statistics
//!
//! ## Exit codes
//!
//! `0` valid, `1` invalid, `2` the subject or configuration could not be
//! read.
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here take parsed args.
//! - Handlers delegate to the validator crates and write to a caller-supplied
//!   writer.

pub mod input;
pub mod logging;
pub mod output;
pub mod rules;
pub mod suite;
pub mod validate;

use std::path::PathBuf;

use anyhow::{Context, Result};
use vigil_engine::SuiteConfig;

pub use output::OutputFormat;

/// Options shared by every subcommand.
#[derive(Debug, Clone, Default)]
pub struct Globals {
    /// Report format.
    pub format: OutputFormat,
    /// Suite configuration file.
    pub config: Option<PathBuf>,
}

impl Globals {
    /// The configured suite settings, or the defaults.
    pub fn suite_config(&self) -> Result<SuiteConfig> {
        match &self.config {
            Some(path) => SuiteConfig::load(path)
                .with_context(|| format!("failed to load configuration {}", path.display())),
            None => Ok(SuiteConfig::default()),
        }
    }
}
