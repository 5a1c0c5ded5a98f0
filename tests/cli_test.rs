//! CLI contract tests
//!
//! Drives the built `nidguard` binary: JSON output shape, --fail-on exit
//! codes, batch input handling, config discovery and `init`.

use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

fn nidguard_bin() -> &'static str {
    env!("CARGO_BIN_EXE_nidguard")
}

/// Command isolated from the caller's config: cwd and HOME point at `dir`
fn nidguard(dir: &Path) -> Command {
    let mut cmd = Command::new(nidguard_bin());
    cmd.current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("NIDGUARD_CONFIG")
        .env_remove("RUST_LOG");
    cmd
}

fn run(dir: &Path, args: &[&str]) -> (i32, String, String) {
    let output = nidguard(dir).args(args).output().expect("Failed to run nidguard");
    (
        output.status.code().unwrap_or(-1),
        String::from_utf8_lossy(&output.stdout).to_string(),
        String::from_utf8_lossy(&output.stderr).to_string(),
    )
}

fn parse_json(stdout: &str) -> serde_json::Value {
    serde_json::from_str(stdout).expect("Invalid JSON output")
}

fn risks(report: &serde_json::Value) -> Vec<String> {
    report["entries"]
        .as_array()
        .expect("entries array")
        .iter()
        .map(|e| e["verdict"]["overall_risk"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// check
// ============================================================================

#[test]
fn test_check_json_output_shape() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), &["check", "79927398713", "--format", "json"]);
    assert_eq!(code, 0);

    let report = parse_json(&stdout);
    let verdict = &report["entries"][0]["verdict"];
    assert_eq!(report["entries"][0]["input"], "79927398713");
    assert_eq!(verdict["overall_risk"], "LOW");
    assert_eq!(verdict["is_valid"], true);
    assert_eq!(verdict["risk_score"], 0.0);
    assert_eq!(verdict["reason"], "NID appears valid");
    assert!(verdict["checks"]["format"].is_object());
    assert!(verdict["checks"]["checksum"].is_object());
    assert!(verdict["checks"]["distribution"].is_object());
    assert_eq!(report["summary"]["total"], 1);
    assert_eq!(report["summary"]["valid"], 1);
}

#[test]
fn test_check_multiple_preserves_order() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(
        dir.path(),
        &["check", "1234567890", "79927398713", "123", "--format", "json"],
    );
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(risks(&report), vec!["HIGH", "LOW", "HIGH"]);
    assert_eq!(
        report["entries"][2]["verdict"]["reason"],
        "NID too short: 3 digits (minimum 10 required)"
    );
}

#[test]
fn test_check_text_output() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(
        dir.path(),
        &["check", "1234567890", "--no-emoji", "--details"],
    );
    assert_eq!(code, 0);
    let plain = console::strip_ansi_codes(&stdout).to_string();
    assert!(plain.contains("[FAIL]"), "stdout: {plain}");
    assert!(plain.contains("HIGH RISK"));
    assert!(plain.contains("Multiple fraud indicators detected"));
    assert!(plain.contains("Format: Sequential pattern detected"));
    assert!(plain.contains("Mathematical Validation"));
}

// ============================================================================
// --fail-on
// ============================================================================

#[test]
fn test_fail_on_high_exits_1() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, stderr) = run(
        dir.path(),
        &["check", "1234567890", "--format", "json", "--fail-on", "high"],
    );
    assert_eq!(code, 1);
    // Output is still printed before failing
    assert_eq!(risks(&parse_json(&stdout)), vec!["HIGH"]);
    assert!(stderr.contains("--fail-on=high"));
}

#[test]
fn test_fail_on_levels_for_medium_verdict() {
    let dir = tempfile::tempdir().unwrap();
    // Checksum failure plus low entropy scores exactly 0.6: MEDIUM
    let (code, _, _) = run(dir.path(), &["check", "12111211112", "--fail-on", "high"]);
    assert_eq!(code, 0);
    let (code, _, _) = run(dir.path(), &["check", "12111211112", "--fail-on", "medium"]);
    assert_eq!(code, 1);
}

#[test]
fn test_fail_on_clean_identifier_exits_0() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(dir.path(), &["check", "79927398713", "--fail-on", "medium"]);
    assert_eq!(code, 0);
}

#[test]
fn test_usage_errors_exit_2() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(dir.path(), &["check"]);
    assert_eq!(code, 2);
    let (code, _, _) = run(dir.path(), &["check", "79927398713", "--fail-on", "low"]);
    assert_eq!(code, 2);
    let (code, _, _) = run(dir.path(), &["--workers", "0", "check", "79927398713"]);
    assert_eq!(code, 2);
}

// ============================================================================
// batch
// ============================================================================

#[test]
fn test_batch_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ids.txt");
    std::fs::write(&input, "79927398713\n\n  1234567890\n12111211112\n81590139624\n").unwrap();

    let (code, stdout, _) = run(
        dir.path(),
        &["--workers", "2", "batch", "ids.txt", "--format", "json"],
    );
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(risks(&report), vec!["LOW", "HIGH", "MEDIUM", "LOW"]);
    assert_eq!(report["entries"][1]["input"], "1234567890");
    assert_eq!(report["summary"]["total"], 4);
    assert_eq!(report["summary"]["valid"], 2);
    assert_eq!(report["summary"]["medium"], 1);
    assert_eq!(report["summary"]["high"], 1);
}

#[test]
fn test_batch_json_array_with_non_strings() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("ids.json");
    std::fs::write(&input, r#"["79927398713", 1234567890, null]"#).unwrap();

    let (code, stdout, _) = run(dir.path(), &["batch", "ids.json", "--format", "json"]);
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(risks(&report), vec!["LOW", "HIGH", "HIGH"]);
    assert_eq!(report["entries"][1]["input"], "1234567890");
    assert_eq!(report["entries"][1]["verdict"]["reason"], "Invalid input");
    assert_eq!(report["entries"][2]["verdict"]["reason"], "Invalid input");
}

#[test]
fn test_batch_from_stdin() {
    let dir = tempfile::tempdir().unwrap();
    let mut child = nidguard(dir.path())
        .args(["batch", "-", "--format", "json", "--fail-on", "high"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn nidguard");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"79927398713\n1111111111\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    let report = parse_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(risks(&report), vec!["LOW", "HIGH"]);
}

#[test]
fn test_batch_missing_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, stderr) = run(dir.path(), &["batch", "missing.txt"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("missing.txt"), "stderr: {stderr}");
}

// ============================================================================
// configuration
// ============================================================================

#[test]
fn test_project_config_thresholds_and_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("nidguard.toml"),
        r#"
[scoring.thresholds]
high = 0.6
medium = 0.25

[defaults]
format = "json"
"#,
    )
    .unwrap();

    // Checksum failure alone scores 0.3, now above the MEDIUM threshold
    let (code, stdout, _) = run(dir.path(), &["check", "81590139624"]);
    assert_eq!(code, 0);
    assert_eq!(risks(&parse_json(&stdout)), vec!["MEDIUM"]);
}

#[test]
fn test_json_project_config() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join(".nidguardrc.json"),
        r#"{"defaults": {"format": "json", "fail_on": "high"}}"#,
    )
    .unwrap();

    let (code, stdout, _) = run(dir.path(), &["check", "1234567890"]);
    assert_eq!(code, 1);
    assert_eq!(risks(&parse_json(&stdout)), vec!["HIGH"]);
}

#[test]
fn test_negative_weights_in_config_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(
        dir.path().join("nidguard.toml"),
        "[scoring.weights]\nformat = -2.0\nchecksum = 1.5\ndistribution = 1.5\n",
    )
    .unwrap();

    let (code, stdout, stderr) = run(dir.path(), &["check", "1234567890", "--format", "json"]);
    assert_eq!(code, 0);
    let report = parse_json(&stdout);
    assert_eq!(risks(&report), vec!["HIGH"]);
    assert_eq!(report["entries"][0]["verdict"]["risk_score"], 0.85);
    assert!(stderr.contains("non-negative"), "stderr: {stderr}");
}

#[test]
fn test_config_fail_on_low_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("nidguard.toml"), "[defaults]\nfail_on = \"low\"\n").unwrap();

    let (code, stdout, stderr) = run(dir.path(), &["check", "79927398713"]);
    assert_eq!(code, 1);
    assert!(stdout.is_empty());
    assert!(stderr.contains("Invalid fail_on level 'low'"), "stderr: {stderr}");
}

#[test]
fn test_explicit_config_via_env() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[scoring]\nformat_failure_score = 0.75\n").unwrap();

    let output = nidguard(dir.path())
        .env("NIDGUARD_CONFIG", &config)
        .args(["check", "123", "--format", "json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(0));
    let report = parse_json(&String::from_utf8_lossy(&output.stdout));
    assert_eq!(report["entries"][0]["verdict"]["risk_score"], 0.75);
}

#[test]
fn test_explicit_config_parse_error_fails() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("broken.toml"), "[scoring\nweights = ").unwrap();

    let (code, _, stderr) = run(
        dir.path(),
        &["--config", "broken.toml", "check", "79927398713"],
    );
    assert_eq!(code, 1);
    assert!(stderr.contains("broken.toml"), "stderr: {stderr}");
}

#[test]
fn test_broken_discovered_config_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("nidguard.toml"), "not = [valid").unwrap();

    let (code, stdout, _) = run(dir.path(), &["check", "79927398713", "--format", "json"]);
    assert_eq!(code, 0);
    assert_eq!(risks(&parse_json(&stdout)), vec!["LOW"]);
}

// ============================================================================
// init / version
// ============================================================================

#[test]
fn test_init_writes_config() {
    let dir = tempfile::tempdir().unwrap();
    let (code, _, _) = run(dir.path(), &["init"]);
    assert_eq!(code, 0);
    let written = std::fs::read_to_string(dir.path().join("nidguard.toml")).unwrap();
    assert!(written.contains("[scoring.weights]"));

    // Second run refuses to overwrite
    let (code, _, stderr) = run(dir.path(), &["init"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("--force"));

    let (code, _, _) = run(dir.path(), &["init", "--force"]);
    assert_eq!(code, 0);

    // The written config is picked up and behaves like the defaults
    let (code, stdout, _) = run(dir.path(), &["check", "12111211112", "--format", "json"]);
    assert_eq!(code, 0);
    assert_eq!(risks(&parse_json(&stdout)), vec!["MEDIUM"]);
}

#[test]
fn test_version() {
    let dir = tempfile::tempdir().unwrap();
    let (code, stdout, _) = run(dir.path(), &["version"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), format!("nidguard {}", env!("CARGO_PKG_VERSION")));
}
