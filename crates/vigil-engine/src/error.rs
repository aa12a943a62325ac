//! # Engine Errors
//!
//! Validation itself never fails; these cover registry management and
//! configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Error type for `vigil-engine`.
#[derive(Error, Debug)]
pub enum EngineError {
    /// No rule is registered under this id.
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    /// A configuration value is out of range or inconsistent.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A configuration document could not be decoded.
    #[error("configuration parse error: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// A configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_subject() {
        assert_eq!(EngineError::UnknownRule("x.y".into()).to_string(), "unknown rule: x.y");
        let io = EngineError::Io {
            path: PathBuf::from("suite.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(io.to_string().starts_with("failed to read suite.yaml"));
    }
}
