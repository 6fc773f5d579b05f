//! CLI entry point for authguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `authguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use authguard_app::{
    decision_exit_code, run_authorize, run_explain, runtime_error_report, serialize_report,
    AuthorizeInput, ExplainOutput,
};
use authguard_settings::Overrides;
use authguard_types::{DecisionReport, OperationKind};
use serde_json::Value;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "authguard",
    version,
    about = "Rule-based authorization decisions for resource-oriented APIs"
)]
struct Cli {
    /// Path to authguard config TOML. Defaults to `authguard.toml`, which may be absent;
    /// an explicitly given path must be readable.
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Override profile (strict|capabilities|open).
    #[arg(long)]
    profile: Option<String>,

    /// Override the decision used when every rule abstains (allow|deny).
    #[arg(long)]
    default_policy: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decide one request and write a decision report.
    Check {
        /// Operation being authorized (read, create, transaction, ...).
        #[arg(long)]
        operation: String,

        /// JSON resource submitted by the caller.
        #[arg(long)]
        input: Option<Utf8PathBuf>,

        /// JSON resource about to be returned to the caller.
        #[arg(long)]
        output: Option<Utf8PathBuf>,

        /// Correlation id copied into logs and the report.
        #[arg(long)]
        request_id: Option<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/authguard/decision.json")]
        report_out: Utf8PathBuf,
    },

    /// Explain a rule op or reason code with a config example.
    Explain {
        /// The rule op (e.g., "transaction") or code (e.g., "nested_composite") to explain.
        identifier: String,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            ref operation,
            ref input,
            ref output,
            ref request_id,
            ref report_out,
        } => cmd_check(
            &cli,
            operation,
            input.as_deref(),
            output.as_deref(),
            request_id.as_deref(),
            report_out,
        ),
        Commands::Explain { identifier } => cmd_explain(&identifier),
    }
}

fn cmd_check(
    cli: &Cli,
    operation: &str,
    input_path: Option<&Utf8Path>,
    output_path: Option<&Utf8Path>,
    request_id: Option<&str>,
    report_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let operation = OperationKind::from_token(operation)
            .with_context(|| format!("unknown operation: {operation}"))?;

        let cfg_text = load_config(cli.config.as_deref())?;

        let input = input_path.map(read_resource).transpose()?;
        let output = output_path.map(read_resource).transpose()?;

        let overrides = Overrides {
            profile: cli.profile.clone(),
            default_policy: cli.default_policy.clone(),
        };

        let result = run_authorize(AuthorizeInput {
            config_text: &cfg_text,
            overrides,
            operation,
            input: input.as_ref(),
            output: output.as_ref(),
            request_id,
        })?;

        write_report_file(report_out, &result.report).context("write report json")?;
        println!("{}", summary_line(&result.report));

        Ok(decision_exit_code(result.report.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(report_out, &report);
            eprintln!("authguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

const DEFAULT_CONFIG: &str = "authguard.toml";

fn load_config(explicit: Option<&Utf8Path>) -> anyhow::Result<String> {
    if let Some(path) = explicit {
        return std::fs::read_to_string(path).with_context(|| format!("read config: {}", path));
    }
    // Missing default config is allowed (profile defaults apply).
    match std::fs::read_to_string(DEFAULT_CONFIG) {
        Ok(text) => Ok(text),
        Err(err) => {
            tracing::debug!(config = DEFAULT_CONFIG, error = %err, "config not loaded; using profile defaults");
            Ok(String::new())
        }
    }
}

fn read_resource(path: &Utf8Path) -> anyhow::Result<Value> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read resource: {}", path))?;
    serde_json::from_str(&text).with_context(|| format!("parse resource json: {}", path))
}

fn summary_line(report: &DecisionReport) -> String {
    let status = report.status.as_str();
    match (&report.rule, &report.message) {
        (Some(rule), _) => format!("{status}: rule '{rule}'"),
        (None, Some(message)) => format!("{status}: {} ({message})", report.reason),
        (None, None) => format!("{status}: {}", report.reason),
    }
}

fn write_report_file(path: &Utf8Path, report: &DecisionReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", authguard_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_ops,
            available_codes,
        } => {
            eprint!(
                "{}",
                authguard_app::format_not_found(&identifier, available_ops, available_codes)
            );
            std::process::exit(1);
        }
    }
}
