//! Errors raised by the accessibility helpers.

use thiserror::Error;
use vigil_core::VigilError;

/// Error type for `vigil-a11y`.
#[derive(Error, Debug)]
pub enum A11yError {
    /// A color literal or other input could not be interpreted.
    #[error(transparent)]
    Core(#[from] VigilError),

    /// No rule is registered under this id.
    #[error("unknown accessibility rule: {0}")]
    UnknownRule(String),
}
