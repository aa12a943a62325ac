//! # `vigil all`
//!
//! Runs the validation suite over one file and prints the comprehensive
//! report. With `--strict`, warnings fail the verdict regardless of the
//! configuration file.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use vigil_engine::ValidationSuite;

use crate::input::{read_schemas, read_value};
use crate::output::write_suite_report;
use crate::Globals;

/// Arguments for `vigil all`.
#[derive(Args, Debug)]
pub struct SuiteArgs {
    /// Document to validate (JSON or YAML).
    pub file: PathBuf,

    /// Component schemas for instance validation.
    #[arg(long)]
    pub schemas: Option<PathBuf>,

    /// Fail on warnings.
    #[arg(long)]
    pub strict: bool,
}

/// Run every applicable validator.
pub fn run_suite(args: &SuiteArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let mut config = globals.suite_config()?;
    config.strict |= args.strict;
    let subject = read_value(&args.file)?;

    let mut suite = ValidationSuite::new(config);
    if let Some(path) = &args.schemas {
        for schema in read_schemas(path)? {
            suite.register_component_schema(schema);
        }
    }

    let report = suite.validate_all(&subject);
    write_suite_report(out, globals.format, &report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputFormat, EXIT_INVALID};
    use std::io::Write as _;
    use vigil_engine::ComprehensiveReport;

    fn file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn config_file_switches_validators_off() {
        let config = file(".yaml", "accessibility: false\nperformance: false\n");
        let subject = file(".json", r#"{"count": 1}"#);
        let globals = Globals {
            format: OutputFormat::Json,
            config: Some(config.path().to_path_buf()),
        };
        let args = SuiteArgs {
            file: subject.path().to_path_buf(),
            schemas: None,
            strict: false,
        };
        let mut out = Vec::new();
        assert_eq!(run_suite(&args, &globals, &mut out).unwrap(), 0);
        let report: ComprehensiveReport = serde_json::from_slice(&out).unwrap();
        assert!(report.accessibility.is_none() && report.performance.is_none());
        assert_eq!(report.score, 100.0);
    }

    #[test]
    fn text_report_for_invalid_instance() {
        let config = file(".yaml", "performance: false\n");
        let subject = file(".json", r#"{"type": "img", "props": {"alt": ""}}"#);
        let schemas = file(".json", r#"[{"name": "img", "props": {"alt": {"type": {"kind": "string"}}}}]"#);
        let globals = Globals {
            format: OutputFormat::Text,
            config: Some(config.path().to_path_buf()),
        };
        let args = SuiteArgs {
            file: subject.path().to_path_buf(),
            schemas: Some(schemas.path().to_path_buf()),
            strict: false,
        };
        let mut out = Vec::new();
        assert_eq!(run_suite(&args, &globals, &mut out).unwrap(), EXIT_INVALID);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("component: PASS"));
        assert!(text.contains("accessibility: FAIL"));
        assert!(text.contains("missing_alt_text"));
    }

    #[test]
    fn bad_config_is_an_error() {
        let config = file(".yaml", "strict: [");
        let subject = file(".json", "{}");
        let globals = Globals {
            format: OutputFormat::Json,
            config: Some(config.path().to_path_buf()),
        };
        let args = SuiteArgs {
            file: subject.path().to_path_buf(),
            schemas: None,
            strict: false,
        };
        let err = run_suite(&args, &globals, &mut Vec::new()).unwrap_err();
        assert!(format!("{err:#}").contains("failed to load configuration"));
    }
}
