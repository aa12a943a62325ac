//! # Output
//!
//! Every subcommand writes either pretty JSON (the serialized result type)
//! or a short human-readable summary. Logs go to stderr, so stdout carries
//! only the report.

use std::io::Write;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;
use vigil_core::ValidationResult;
use vigil_engine::{ComprehensiveReport, ValidationReport};

/// Exit status for a valid subject.
pub const EXIT_VALID: u8 = 0;
/// Exit status for an invalid subject.
pub const EXIT_INVALID: u8 = 1;
/// Exit status for an infrastructure failure (I/O, parse, configuration).
pub const EXIT_FAILURE: u8 = 2;

/// Report format on stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON.
    Json,
    /// Human-readable summary.
    #[default]
    Text,
}

/// Exit status for a verdict.
pub fn exit_code(valid: bool) -> u8 {
    if valid {
        EXIT_VALID
    } else {
        EXIT_INVALID
    }
}

/// Write `value` as pretty JSON followed by a newline.
pub fn write_json<T: Serialize>(out: &mut dyn Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn verdict(valid: bool) -> &'static str {
    if valid {
        "PASS"
    } else {
        "FAIL"
    }
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{n} {word}")
    } else {
        format!("{n} {word}s")
    }
}

/// Write one validation result and return its exit status.
pub fn write_result(
    out: &mut dyn Write,
    format: OutputFormat,
    label: &str,
    result: &ValidationResult,
) -> Result<u8> {
    match format {
        OutputFormat::Json => write_json(out, result)?,
        OutputFormat::Text => write_result_text(out, label, result)?,
    }
    Ok(exit_code(result.is_valid()))
}

fn write_result_text(out: &mut dyn Write, label: &str, result: &ValidationResult) -> Result<()> {
    writeln!(
        out,
        "{label}: {} ({}, {})",
        verdict(result.is_valid()),
        plural(result.errors.len(), "error"),
        plural(result.warnings.len(), "warning")
    )?;
    for error in &result.errors {
        let field = error.field.as_deref().unwrap_or("-");
        writeln!(out, "  error    {:<32} {:<24} {}", error.code, field, error.message)?;
        if let Some(suggestion) = &error.suggestion {
            writeln!(out, "           hint: {suggestion}")?;
        }
    }
    for warning in &result.warnings {
        let field = warning.field.as_deref().unwrap_or("-");
        writeln!(out, "  warning  {:<32} {:<24} {}", warning.code, field, warning.message)?;
        if let Some(suggestion) = &warning.suggestion {
            writeln!(out, "           hint: {suggestion}")?;
        }
    }
    if let Some(a11y) = &result.accessibility {
        writeln!(
            out,
            "  accessibility: score {:.1}, level {}, {} checked",
            a11y.score,
            a11y.level.as_str(),
            plural(a11y.metrics.elements_checked, "element")
        )?;
    }
    if let Some(perf) = &result.performance {
        writeln!(out, "  performance: score {:.1}, grade {}", perf.score, perf.grade.as_str())?;
    }
    if let Some(theme) = &result.theme {
        writeln!(
            out,
            "  theme: score {:.1}, {}",
            theme.score,
            plural(theme.token_count, "token")
        )?;
    }
    Ok(())
}

/// Write a suite report and return its exit status.
pub fn write_suite_report(
    out: &mut dyn Write,
    format: OutputFormat,
    report: &ComprehensiveReport,
) -> Result<u8> {
    match format {
        OutputFormat::Json => write_json(out, report)?,
        OutputFormat::Text => {
            writeln!(
                out,
                "vigil {}: {} (score {:.1}{}, {:.1} ms)",
                report.version,
                verdict(report.valid),
                report.score,
                if report.strict { ", strict" } else { "" },
                report.duration_ms
            )?;
            let dispatched = [
                ("component", &report.component),
                ("schema", &report.schema),
                ("runtime", &report.runtime),
            ];
            for (label, result) in dispatched {
                if let Some(result) = result {
                    write_result_text(out, label, result)?;
                }
            }
            if let Some(a11y) = &report.accessibility {
                writeln!(
                    out,
                    "accessibility: {} (score {:.1}, {}, {})",
                    verdict(a11y.compliant),
                    a11y.score,
                    plural(a11y.violations.len(), "violation"),
                    plural(a11y.warnings.len(), "warning")
                )?;
                for v in &a11y.violations {
                    writeln!(out, "  {:<9} {:<28} {:<24} {}", v.impact.as_str(), v.code, v.path, v.message)?;
                }
            }
            if let Some(perf) = &report.performance {
                writeln!(
                    out,
                    "performance: {} (score {:.1}, grade {})",
                    verdict(perf.meets_thresholds),
                    perf.score,
                    perf.grade.as_str()
                )?;
            }
            if let Some(theme) = &report.theme {
                writeln!(
                    out,
                    "theme: {} (score {:.1}, {})",
                    verdict(theme.valid),
                    theme.score,
                    plural(theme.violations.len(), "finding")
                )?;
                for v in &theme.violations {
                    writeln!(out, "  {:<28} {}", v.code, v.message)?;
                }
            }
        }
    }
    Ok(exit_code(report.valid))
}

/// Write the registry summary.
pub fn write_rules(out: &mut dyn Write, format: OutputFormat, report: &ValidationReport) -> Result<()> {
    match format {
        OutputFormat::Json => write_json(out, report),
        OutputFormat::Text => {
            for rule in &report.rules {
                writeln!(
                    out,
                    "{:<24} {:<14} {:<7} {:<8} {}",
                    rule.id,
                    rule.category.as_str(),
                    rule.level.as_str(),
                    if rule.enabled { "enabled" } else { "disabled" },
                    rule.name
                )?;
            }
            let stats = &report.stats;
            writeln!(
                out,
                "{} ({} enabled, {} disabled)",
                plural(stats.total, "rule"),
                stats.enabled,
                stats.disabled
            )?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::{ValidationError, ValidationWarning};

    fn render(format: OutputFormat, result: &ValidationResult) -> (u8, String) {
        let mut buf = Vec::new();
        let code = write_result(&mut buf, format, "component", result).unwrap();
        (code, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn text_summary_lists_findings() {
        let mut result = ValidationResult::ok();
        result.add_error(
            ValidationError::new("prop.required", "Required prop 'label' is missing").with_field("label"),
        );
        result.add_warning(ValidationWarning::new("prop.unknown", "Unknown prop 'x'").with_suggestion("remove it"));
        let (code, text) = render(OutputFormat::Text, &result);
        assert_eq!(code, EXIT_INVALID);
        assert!(text.starts_with("component: FAIL (1 error, 1 warning)"));
        assert!(text.contains("prop.required"));
        assert!(text.contains("hint: remove it"));
    }

    #[test]
    fn json_output_round_trips() {
        let (code, text) = render(OutputFormat::Json, &ValidationResult::ok());
        assert_eq!(code, EXIT_VALID);
        let decoded: ValidationResult = serde_json::from_str(&text).unwrap();
        assert!(decoded.valid);
    }

    #[test]
    fn rules_table_has_a_footer() {
        let report = vigil_engine::ValidationEngine::default().validation_report();
        let mut buf = Vec::new();
        write_rules(&mut buf, OutputFormat::Text, &report).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("component.structure"));
        assert!(text.trim_end().ends_with("2 rules (2 enabled, 0 disabled)"));
    }
}
