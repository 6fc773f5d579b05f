//! Developer tasks (schema generation, explain coverage, report normalization).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use authguard_domain::RuleOp;
use authguard_types::explain;
use schemars::schema_for;
use std::fs;
use std::path::PathBuf;

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("determine current directory")?,
    };

    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        return Ok(parent.to_path_buf());
    }
    Ok(manifest_dir)
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

/// Schema definition with its target filename.
struct SchemaTarget {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_decision_schema() -> schemars::Schema {
    schema_for!(authguard_types::DecisionReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(authguard_settings::AuthguardConfigV1)
}

fn schema_targets() -> Vec<SchemaTarget> {
    vec![
        SchemaTarget {
            filename: "authguard.decision.v1.json",
            generate: generate_decision_schema,
        },
        SchemaTarget {
            filename: "authguard.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for target in schema_targets() {
        let json = serialize_schema(&(target.generate)())?;
        let path = dir.join(target.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for target in schema_targets() {
        let path = dir.join(target.filename);
        if !path.exists() {
            missing.push(target.filename);
            continue;
        }

        let expected = serialize_schema(&(target.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(target.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }
    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

/// Every rule op the engine knows and every rejection code must have an explanation,
/// and the explain registry must not list ops the engine does not know.
fn explain_coverage() -> anyhow::Result<()> {
    let mut errors = Vec::new();

    let engine_ops: Vec<&str> = RuleOp::ALL.iter().map(|op| op.as_str()).collect();
    for op in &engine_ops {
        if !explain::all_rule_ops().contains(op) {
            errors.push(format!("Rule op '{}' is missing from the explain registry", op));
        }
    }
    for op in explain::all_rule_ops() {
        if !engine_ops.contains(op) {
            errors.push(format!("Explained rule op '{}' is unknown to the engine", op));
        }
    }

    let identifiers = explain::all_rule_ops()
        .iter()
        .map(|op| ("Rule op", *op))
        .chain(explain::all_codes().iter().map(|code| ("Code", *code)));
    for (kind, identifier) in identifiers {
        match explain::lookup_explanation(identifier) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("{kind} '{identifier}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("{kind} '{identifier}' has empty description"));
                }
                if exp.example.is_empty() {
                    errors.push(format!("{kind} '{identifier}' has empty example"));
                }
            }
            None => errors.push(format!("{kind} '{identifier}' has no explanation")),
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule ops have explanations", explain::all_rule_ops().len());
        println!("✓ {} codes have explanations", explain::all_codes().len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {}", error);
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

/// Check that a file is a decision report, then print it with timestamps and tool version
/// replaced by placeholders, ready to be stored as a golden file.
fn normalize_report(path: Option<&str>) -> anyhow::Result<()> {
    let Some(path) = path else {
        bail!("normalize-report requires a report path");
    };
    let text = fs::read_to_string(path).with_context(|| format!("Failed to read {path}"))?;
    let report = authguard_app::parse_report_json(&text)
        .with_context(|| format!("{path} is not an authguard decision report"))?;
    let value = serde_json::to_value(&report).context("serialize report")?;
    let normalized = authguard_test_util::normalize_nondeterministic(value);
    println!(
        "{}",
        serde_json::to_string_pretty(&normalized).context("serialize normalized report")?
    );
    Ok(())
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help                    Show this message");
    eprintln!("  emit-schemas            Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas        Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids        Print known schema IDs");
    eprintln!("  explain-coverage        Validate all rule ops and codes have explanations");
    eprintln!("  normalize-report PATH   Print a report with nondeterministic fields masked");
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "explain-coverage" => explain_coverage(),
        "normalize-report" => normalize_report(args.get(2).map(|s| s.as_str())),
        "print-schema-ids" => {
            for target in schema_targets() {
                println!("{}", target.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
