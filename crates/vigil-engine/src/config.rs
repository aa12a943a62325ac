//! # Engine and Suite Configuration
//!
//! Every field has a documented default, so a configuration document only
//! needs to name what it changes:
//!
//! ```yaml
//! strict: true
//! performance: false
//! engine:
//!   options:
//!     exclude_rules: [schema.structure]
//!   accessibility:
//!     level: AAA
//! ```
//!
//! YAML is a superset of JSON, so [`SuiteConfig::from_yaml_str`] accepts
//! both.

use std::path::Path;

use serde::{Deserialize, Serialize};
use vigil_a11y::A11yConfig;
use vigil_core::{ValidationLevel, ValidationOptions};
use vigil_perf::PerformanceConfig;
use vigil_runtime::RuntimeConfig;
use vigil_theme::ThemeConfig;

use crate::error::EngineError;

/// Settings for a [`ValidationEngine`](crate::ValidationEngine).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct EngineConfig {
    /// Level used by the engine's convenience entry points.
    pub level: ValidationLevel,
    /// Options used by the engine's convenience entry points.
    pub options: ValidationOptions,
    /// Rule ids registered but disabled at construction.
    pub disabled_rules: Vec<String>,
    /// Accessibility validator settings.
    pub accessibility: A11yConfig,
    /// Performance validator settings.
    pub performance: PerformanceConfig,
    /// Theme validator settings.
    pub theme: ThemeConfig,
    /// Runtime input validator settings.
    pub runtime: RuntimeConfig,
}

impl EngineConfig {
    /// Reject values no validator can work with.
    pub fn validate(&self) -> Result<(), EngineError> {
        let contrast = &self.accessibility.contrast;
        for (name, ratio) in [
            ("accessibility.contrast.min_normal", contrast.min_normal),
            ("accessibility.contrast.min_large", contrast.min_large),
            ("accessibility.contrast.min_enhanced", contrast.min_enhanced),
            ("theme.min_contrast_ratio", self.theme.min_contrast_ratio),
        ] {
            if !(1.0..=21.0).contains(&ratio) {
                return Err(EngineError::Config(format!(
                    "{name} must lie in [1, 21], got {ratio}"
                )));
            }
        }
        if self.performance.thresholds.max_samples == 0 {
            return Err(EngineError::Config(
                "performance.thresholds.max_samples must be positive".into(),
            ));
        }
        if self.performance.thresholds.min_frame_rate <= 0.0 {
            return Err(EngineError::Config(
                "performance.thresholds.min_frame_rate must be positive".into(),
            ));
        }
        if self.runtime.min_phone_length > self.runtime.max_phone_length {
            return Err(EngineError::Config(format!(
                "runtime.min_phone_length ({}) exceeds runtime.max_phone_length ({})",
                self.runtime.min_phone_length, self.runtime.max_phone_length
            )));
        }
        Ok(())
    }
}

/// Settings for a [`ValidationSuite`](crate::ValidationSuite).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct SuiteConfig {
    /// Engine and sub-validator settings.
    pub engine: EngineConfig,
    /// Run the accessibility validator.
    pub accessibility: bool,
    /// Run the performance validator.
    pub performance: bool,
    /// Run the theme validator on theme documents.
    pub theme: bool,
    /// Any warning fails the overall verdict.
    pub strict: bool,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            accessibility: true,
            performance: true,
            theme: true,
            strict: false,
        }
    }
}

impl SuiteConfig {
    /// Parse and check a YAML or JSON configuration document.
    pub fn from_yaml_str(text: &str) -> Result<Self, EngineError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.engine.validate()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    pub fn load(path: &Path) -> Result<Self, EngineError> {
        let text = std::fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }
}
