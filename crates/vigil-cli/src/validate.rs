//! # Single-Validator Subcommands
//!
//! `component`, `schema`, `a11y`, `perf`, `theme`, and `runtime` each run
//! one validator over one file and print a [`ValidationResult`]. Settings
//! come from the global `--config` file when given.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use tracing::info;
use vigil_a11y::AccessibilityValidator;
use vigil_core::a11y::WcagLevel;
use vigil_core::ValidationResult;
use vigil_engine::ValidationEngine;
use vigil_perf::PerformanceValidator;
use vigil_theme::ThemeValidator;

use crate::input::{read_schemas, read_value};
use crate::output::write_result;
use crate::Globals;

/// Arguments for `vigil component`.
#[derive(Args, Debug)]
pub struct ComponentArgs {
    /// Component instance file (JSON or YAML).
    pub instance: PathBuf,

    /// File holding one schema, a list of schemas, or a name-keyed map.
    #[arg(long)]
    pub schemas: PathBuf,

    /// Component type to assume when the instance has no `type`.
    #[arg(long = "type")]
    pub type_name: Option<String>,
}

/// Arguments for the subcommands that take a single file.
#[derive(Args, Debug)]
pub struct FileArgs {
    /// Document to validate (JSON or YAML).
    pub file: PathBuf,
}

/// Arguments for `vigil a11y`.
#[derive(Args, Debug)]
pub struct A11yArgs {
    /// UI tree to check (JSON or YAML).
    pub file: PathBuf,

    /// Conformance level: A, AA, or AAA. Overrides the configuration.
    #[arg(long, value_parser = parse_level)]
    pub level: Option<WcagLevel>,
}

/// Arguments for `vigil runtime`.
#[derive(Args, Debug)]
pub struct RuntimeArgs {
    /// Submitted data (JSON or YAML).
    pub file: PathBuf,

    /// Check the data as a form submission: required fields and CSRF token.
    #[arg(long)]
    pub form: bool,
}

fn parse_level(s: &str) -> Result<WcagLevel, String> {
    s.parse().map_err(|e: vigil_core::VigilError| e.to_string())
}

/// Validate a component instance.
pub fn run_component(args: &ComponentArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let schemas = read_schemas(&args.schemas)?;
    let instance = read_value(&args.instance)?;

    let mut engine = ValidationEngine::new(config.engine);
    let count = schemas.len();
    for schema in schemas {
        engine.register_component_schema(schema);
    }
    info!(schemas = count, "component schemas registered");

    let result = engine.validate_component(&instance, args.type_name.as_deref());
    write_result(out, globals.format, "component", &result)
}

/// Validate a schema document.
pub fn run_schema(args: &FileArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let document = read_value(&args.file)?;
    let result = ValidationEngine::new(config.engine).validate_schema(&document);
    write_result(out, globals.format, "schema", &result)
}

/// Run the accessibility checks.
pub fn run_a11y(args: &A11yArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let tree = read_value(&args.file)?;
    let mut a11y = config.engine.accessibility;
    if let Some(level) = args.level {
        a11y.level = level;
    }
    let report = AccessibilityValidator::new(a11y).validate_accessibility(&tree);
    let result = vigil_a11y::report_to_result(report, config.engine.level);
    write_result(out, globals.format, "accessibility", &result)
}

/// Run the performance checks.
pub fn run_perf(args: &FileArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let subject = read_value(&args.file)?;
    let metrics = PerformanceValidator::new(config.engine.performance).validate_performance(&subject);
    let result = vigil_perf::metrics_to_result(metrics, config.engine.level);
    write_result(out, globals.format, "performance", &result)
}

/// Run the design token checks.
pub fn run_theme(args: &FileArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let theme = read_value(&args.file)?;
    let report = ThemeValidator::new(config.engine.theme).validate_theme(&theme);
    let result: ValidationResult = vigil_theme::report_to_result(report, config.engine.level);
    write_result(out, globals.format, "theme", &result)
}

/// Check submitted data. The sanitized copy is reported as `sanitized`
/// metadata.
pub fn run_runtime(args: &RuntimeArgs, globals: &Globals, out: &mut dyn Write) -> Result<u8> {
    let config = globals.suite_config()?;
    let data = read_value(&args.file)?;
    let engine = ValidationEngine::new(config.engine);
    let result = if args.form {
        let outcome = engine.validate_form(&data);
        let mut result = outcome.result;
        if let Some(sanitized) = outcome.sanitized {
            result.set_metadata("sanitized", sanitized);
        }
        result
    } else {
        engine.validate_runtime(&data)
    };
    let label = if args.form { "form" } else { "runtime" };
    write_result(out, globals.format, label, &result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{OutputFormat, EXIT_INVALID, EXIT_VALID};
    use std::io::Write as _;

    fn file(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    fn json_globals() -> Globals {
        Globals {
            format: OutputFormat::Json,
            config: None,
        }
    }

    const BUTTON_SCHEMA: &str =
        r#"{"name": "button", "props": {"label": {"type": {"kind": "string"}, "required": true}}}"#;

    #[test]
    fn component_missing_label_is_invalid() {
        let schemas = file(".json", BUTTON_SCHEMA);
        let instance = file(".json", r#"{"type": "button", "props": {}}"#);
        let args = ComponentArgs {
            instance: instance.path().to_path_buf(),
            schemas: schemas.path().to_path_buf(),
            type_name: None,
        };
        let mut out = Vec::new();
        let code = run_component(&args, &json_globals(), &mut out).unwrap();
        assert_eq!(code, EXIT_INVALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert_eq!(result.errors[0].code, "prop.required");
    }

    #[test]
    fn component_type_flag_fills_missing_type() {
        let schemas = file(".json", BUTTON_SCHEMA);
        let instance = file(".yaml", "props:\n  label: Save\n");
        let args = ComponentArgs {
            instance: instance.path().to_path_buf(),
            schemas: schemas.path().to_path_buf(),
            type_name: Some("button".into()),
        };
        let mut out = Vec::new();
        assert_eq!(run_component(&args, &Globals::default(), &mut out).unwrap(), EXIT_VALID);
        assert!(String::from_utf8(out).unwrap().starts_with("component: PASS"));
    }

    #[test]
    fn schema_length_conflict() {
        let doc = file(
            ".json",
            r#"{"name": "bio", "type": "text", "validation": {"minLength": 10, "maxLength": 5}}"#,
        );
        let mut out = Vec::new();
        let code = run_schema(&FileArgs { file: doc.path().to_path_buf() }, &json_globals(), &mut out).unwrap();
        assert_eq!(code, EXIT_INVALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert!(result.error_codes().contains("field.validation.length_conflict"));
    }

    #[test]
    fn a11y_level_flag_overrides_config() {
        let tree = file(
            ".json",
            r##"{"type": "p", "style": {"color": "#777777", "backgroundColor": "#ffffff", "fontSize": "16pt"}, "children": ["text"]}"##,
        );
        let mut out = Vec::new();
        let args = A11yArgs {
            file: tree.path().to_path_buf(),
            level: Some(WcagLevel::A),
        };
        assert_eq!(run_a11y(&args, &json_globals(), &mut out).unwrap(), EXIT_VALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert_eq!(result.accessibility.unwrap().level, WcagLevel::A);

        let mut out = Vec::new();
        let args = A11yArgs {
            file: tree.path().to_path_buf(),
            level: None,
        };
        assert_eq!(run_a11y(&args, &json_globals(), &mut out).unwrap(), EXIT_INVALID);
    }

    #[test]
    fn perf_embeds_metrics() {
        let subject = file(".json", r#"{"title": "small"}"#);
        let mut out = Vec::new();
        run_perf(&FileArgs { file: subject.path().to_path_buf() }, &json_globals(), &mut out).unwrap();
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert!(result.performance.is_some());
        assert!(result.metadata.contains_key("performance_grade"));
    }

    #[test]
    fn theme_reports_missing_tokens() {
        let theme = file(".yaml", "tokens:\n  colors:\n    primary: \"#0af\"\n");
        let mut out = Vec::new();
        let code = run_theme(&FileArgs { file: theme.path().to_path_buf() }, &json_globals(), &mut out).unwrap();
        assert_eq!(code, EXIT_INVALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert!(result.error_codes().contains("missing_required_tokens"));
    }

    #[test]
    fn runtime_form_mode_requires_a_token() {
        let data = file(".yaml", "email: ada@example.org\nnote: <b>hi</b>\n");
        let mut args = RuntimeArgs {
            file: data.path().to_path_buf(),
            form: false,
        };

        let mut out = Vec::new();
        assert_eq!(run_runtime(&args, &json_globals(), &mut out).unwrap(), EXIT_VALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert_eq!(result.metadata["sanitized"]["note"], "&lt;b&gt;hi&lt;/b&gt;");

        args.form = true;
        let mut out = Vec::new();
        assert_eq!(run_runtime(&args, &json_globals(), &mut out).unwrap(), EXIT_INVALID);
        let result: ValidationResult = serde_json::from_slice(&out).unwrap();
        assert!(result.error_codes().contains("missing_required_field"));
        assert!(result.metadata.contains_key("sanitized"));
    }

    #[test]
    fn unreadable_input_is_an_error() {
        let args = FileArgs {
            file: PathBuf::from("/nonexistent/vigil/doc.json"),
        };
        assert!(run_schema(&args, &Globals::default(), &mut Vec::new()).is_err());
    }

    #[test]
    fn level_parser() {
        assert_eq!(parse_level("aaa").unwrap(), WcagLevel::AAA);
        assert!(parse_level("B").is_err());
    }
}
