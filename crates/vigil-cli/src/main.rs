//! # vigil CLI entry point
//!
//! Parses command-line arguments, installs the tracing subscriber, and
//! dispatches to subcommand handlers. Handler errors map to exit code 2.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use vigil_cli::output::{OutputFormat, EXIT_FAILURE};
use vigil_cli::rules::run_rules;
use vigil_cli::suite::{run_suite, SuiteArgs};
use vigil_cli::validate::{
    run_a11y, run_component, run_perf, run_runtime, run_schema, run_theme, A11yArgs, ComponentArgs,
    FileArgs, RuntimeArgs,
};
use vigil_cli::{logging, Globals};

/// Vigil: rule-based validation for UI components, schemas, accessibility,
/// performance, and design tokens.
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    /// Report format on stdout.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    format: OutputFormat,

    /// Suite configuration file (YAML or JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a component instance against schemas from a file.
    Component(ComponentArgs),

    /// Validate a form, field, or theme schema document.
    Schema(FileArgs),

    /// Check a UI tree for accessibility issues.
    A11y(A11yArgs),

    /// Score a UI value against performance budgets.
    Perf(FileArgs),

    /// Check a theme's design tokens.
    Theme(FileArgs),

    /// Check submitted runtime data or, with --form, a form submission.
    Runtime(RuntimeArgs),

    /// Run every applicable validator and report one verdict.
    All(SuiteArgs),

    /// List registered rules with statistics.
    Rules,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.json_logs);
    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "vigil starting");

    let globals = Globals {
        format: cli.format,
        config: cli.config,
    };
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    let result = match &cli.command {
        Commands::Component(args) => run_component(args, &globals, &mut out),
        Commands::Schema(args) => run_schema(args, &globals, &mut out),
        Commands::A11y(args) => run_a11y(args, &globals, &mut out),
        Commands::Perf(args) => run_perf(args, &globals, &mut out),
        Commands::Theme(args) => run_theme(args, &globals, &mut out),
        Commands::Runtime(args) => run_runtime(args, &globals, &mut out),
        Commands::All(args) => run_suite(args, &globals, &mut out),
        Commands::Rules => run_rules(&globals, &mut out),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vigil_core::a11y::WcagLevel;

    #[test]
    fn cli_parse_component() {
        let cli = Cli::try_parse_from([
            "vigil",
            "component",
            "button.json",
            "--schemas",
            "schemas.yaml",
            "--type",
            "button",
        ])
        .unwrap();
        let Commands::Component(args) = cli.command else {
            panic!("expected component");
        };
        assert_eq!(args.instance, PathBuf::from("button.json"));
        assert_eq!(args.schemas, PathBuf::from("schemas.yaml"));
        assert_eq!(args.type_name.as_deref(), Some("button"));
    }

    #[test]
    fn cli_component_requires_schemas() {
        assert!(Cli::try_parse_from(["vigil", "component", "button.json"]).is_err());
    }

    #[test]
    fn cli_parse_a11y_level() {
        let cli = Cli::try_parse_from(["vigil", "a11y", "page.json", "--level", "AAA"]).unwrap();
        let Commands::A11y(args) = cli.command else {
            panic!("expected a11y");
        };
        assert_eq!(args.level, Some(WcagLevel::AAA));
        assert!(Cli::try_parse_from(["vigil", "a11y", "page.json", "--level", "B"]).is_err());
    }

    #[test]
    fn cli_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "vigil",
            "all",
            "page.json",
            "--config",
            "suite.yaml",
            "--format",
            "json",
            "-vv",
            "--json-logs",
        ])
        .unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("suite.yaml")));
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.verbose, 2);
        assert!(cli.json_logs);
        assert!(matches!(cli.command, Commands::All(_)));
    }

    #[test]
    fn cli_defaults() {
        let cli = Cli::try_parse_from(["vigil", "rules"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Text);
        assert_eq!(cli.verbose, 0);
        assert!(cli.config.is_none());
    }

    #[test]
    fn cli_parse_single_file_subcommands() {
        for name in ["schema", "perf", "theme"] {
            let cli = Cli::try_parse_from(["vigil", name, "doc.yaml"]).unwrap();
            assert!(!matches!(cli.command, Commands::Rules | Commands::All(_)));
        }
    }

    #[test]
    fn cli_parse_runtime_form_flag() {
        let cli = Cli::try_parse_from(["vigil", "runtime", "signup.json", "--form"]).unwrap();
        let Commands::Runtime(args) = cli.command else {
            panic!("expected runtime");
        };
        assert_eq!(args.file, PathBuf::from("signup.json"));
        assert!(args.form);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["vigil"]).is_err());
        assert!(Cli::try_parse_from(["vigil", "lint"]).is_err());
    }
}
