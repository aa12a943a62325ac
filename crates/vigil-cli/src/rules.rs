//! # `vigil rules`
//!
//! Prints the rules a default-configured engine registers, with counts by
//! category, level, and state.

use std::io::Write;

use anyhow::Result;
use vigil_engine::ValidationEngine;

use crate::output::{write_rules, EXIT_VALID};
use crate::Globals;

/// List registered rules.
pub fn run_rules(globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let engine = ValidationEngine::new(config.engine);
    write_rules(out, globals.format, &engine.validation_report())?;
    Ok(EXIT_VALID)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::OutputFormat;
    use std::io::Write as _;
    use vigil_engine::ValidationReport;

    #[test]
    fn disabled_rules_from_config_are_reported() {
        let mut config = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(config, "engine:\n  disabled_rules: [schema.structure]").unwrap();
        let globals = Globals {
            format: OutputFormat::Json,
            config: Some(config.path().to_path_buf()),
        };
        let mut out = Vec::new();
        assert_eq!(run_rules(&globals, &mut out).unwrap(), EXIT_VALID);
        let report: ValidationReport = serde_json::from_slice(&out).unwrap();
        assert_eq!(report.stats.total, 3);
        assert_eq!(report.stats.disabled, 1);
        assert_eq!(report.stats.by_category["schema"], 1);
    }
}
