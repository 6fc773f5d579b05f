use std::process::Command;

fn xtask(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_xtask"))
        .args(args)
        .output()
        .expect("run xtask")
}

#[test]
fn xtask_help_runs() {
    let output = xtask(&["help"]);
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("xtask commands"));
}

#[test]
fn explain_coverage_passes() {
    let output = xtask(&["explain-coverage"]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn print_schema_ids_lists_decision_and_config() {
    let output = xtask(&["print-schema-ids"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("authguard.decision.v1"));
    assert!(stdout.contains("authguard.config.v1"));
}

#[test]
fn unknown_command_fails() {
    let output = xtask(&["frobnicate"]);
    assert!(!output.status.success());
}

#[test]
fn normalize_report_masks_nondeterministic_fields() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("decision.json");
    std::fs::write(
        &path,
        r#"{
  "schema": "authguard.decision.v1",
  "tool": {"name": "authguard", "version": "0.1.0"},
  "started_at": "2026-01-01T00:00:00Z",
  "finished_at": "2026-01-01T00:00:01Z",
  "profile": "strict",
  "operation": "read",
  "status": "deny",
  "reason": "default_policy"
}"#,
    )
    .expect("write report");

    let output = xtask(&["normalize-report", path.to_str().expect("utf8 path")]);
    assert!(
        output.status.success(),
        "{}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("\"version\": \"__VERSION__\""), "{stdout}");
    assert!(stdout.contains("\"started_at\": \"__TIMESTAMP__\""), "{stdout}");
}

#[test]
fn normalize_report_rejects_foreign_reports() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("other.json");
    std::fs::write(&path, r#"{"schema": "sensor.report.v1", "findings": []}"#)
        .expect("write report");

    let output = xtask(&["normalize-report", path.to_str().expect("utf8 path")]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("is not an authguard decision report"), "{stderr}");
}
