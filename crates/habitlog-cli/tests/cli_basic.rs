//! Basic CLI E2E tests.
//!
//! Tests invoke CLI commands via cargo run against the dev data directory
//! and an API address nothing listens on.

use std::process::Command;

/// Run a CLI command and return (exit code, stdout, stderr).
fn run_cli(args: &[&str]) -> (i32, String, String) {
    let output = Command::new("cargo")
        .args(["run", "-q", "-p", "habitlog-cli", "--"])
        .args(args)
        .env("HABITLOG_ENV", "dev")
        .env("HABITLOG_BASE_URL", "http://127.0.0.1:9/")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (code, stdout, stderr)
}

#[test]
fn test_help_lists_commands() {
    let (code, stdout, _) = run_cli(&["--help"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("habits"));
    assert!(stdout.contains("reminder"));
    assert!(stdout.contains("config"));
}

#[test]
fn test_reminder_next() {
    let (code, stdout, _) = run_cli(&["reminder", "next"]);
    assert_eq!(code, 0, "reminder next failed");
    assert!(stdout.contains("11:00"), "unexpected output: {stdout}");
}

#[test]
fn test_reminder_status_json() {
    let (code, stdout, _) = run_cli(&["reminder", "status", "--json"]);
    assert_eq!(code, 0, "reminder status failed");
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert!(parsed.get("next_trigger_at").is_some());
}

#[test]
fn test_config_get_base_url() {
    let (code, stdout, _) = run_cli(&["config", "get", "api.base_url"]);
    assert_eq!(code, 0, "config get failed");
    assert!(stdout.starts_with("http"));
}

#[test]
fn test_config_get_unknown_key() {
    let (code, _, stderr) = run_cli(&["config", "get", "no.such.key"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_config_set_rejects_unusable_base_url() {
    let (code, _, stderr) = run_cli(&["config", "set", "api.base_url", "not a url"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("api.base_url"), "unexpected stderr: {stderr}");

    let (_, stdout, _) = run_cli(&["config", "get", "api.base_url"]);
    assert!(stdout.starts_with("http"));
}

#[test]
fn test_config_get_effective_applies_env_override() {
    let (code, stdout, _) = run_cli(&["config", "get", "api.base_url", "--effective"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "http://127.0.0.1:9/");
}

#[test]
fn test_config_path_is_dev_dir() {
    let (code, stdout, _) = run_cli(&["config", "path"]);
    assert_eq!(code, 0);
    assert!(stdout.trim().ends_with("config.toml"));
    assert!(stdout.contains("habitlog-dev"));
}

#[test]
fn test_habits_list_invalid_date() {
    let (code, _, stderr) = run_cli(&["habits", "list", "--date", "2026-13-40"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("invalid date"));
}

#[test]
fn test_habits_list_unreachable_api() {
    let (code, stdout, stderr) = run_cli(&["habits", "list", "--offset", "-1"]);
    assert_eq!(code, 1, "expected failure, got stdout: {stdout}");
    assert!(stderr.contains("error:"));
}

#[test]
fn test_reminder_cancel_is_visible_until_armed() {
    let (code, stdout, _) = run_cli(&["reminder", "cancel"]);
    assert_eq!(code, 0, "reminder cancel failed");
    assert!(stdout.contains("stops before its next firing"));

    let (_, stdout, _) = run_cli(&["reminder", "status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stopped"], serde_json::Value::Bool(true));

    let (code, stdout, _) = run_cli(&["reminder", "arm"]);
    assert_eq!(code, 0, "reminder arm failed");
    assert!(stdout.contains("record"), "unexpected output: {stdout}");
    assert!(!stdout.contains("armed for"));

    let (_, stdout, _) = run_cli(&["reminder", "status", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["stopped"], serde_json::Value::Bool(false));
}
