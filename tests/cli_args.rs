//! Integration tests for the anycache binary
//!
//! Runs the CLI against a temporary cache root.

use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run the CLI with given args and capture output
fn run_cli(cache_dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_anycache"))
        .env_remove("ANYCACHE_DIR")
        .arg("--cache-dir")
        .arg(cache_dir)
        .args(args)
        .output()
        .expect("Failed to execute anycache")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = Command::new(env!("CARGO_BIN_EXE_anycache"))
        .arg("--help")
        .output()
        .expect("Failed to execute anycache");
    assert!(output.status.success(), "Expected --help to exit successfully");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("anycache"), "Help should mention anycache");
    assert!(stdout.contains("cache-dir"), "Help should mention --cache-dir");
}

#[test]
fn test_set_get_remove_round_trip() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let output = run_cli(temp_dir.path(), &["profiles", "set", "alice", r#"{"age":30}"#]);
    assert!(output.status.success());
    assert!(temp_dir.path().join("profiles").join("alice").exists());

    let output = run_cli(temp_dir.path(), &["profiles", "get", "alice"]);
    assert!(output.status.success());
    let value: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("get should print JSON");
    assert_eq!(value, serde_json::json!({"age": 30}));

    let output = run_cli(temp_dir.path(), &["profiles", "remove", "alice"]);
    assert!(output.status.success());

    let output = run_cli(temp_dir.path(), &["profiles", "exists", "alice"]);
    assert!(!output.status.success(), "exists should fail for a removed key");
    assert_eq!(String::from_utf8_lossy(&output.stdout).trim(), "false");
}

#[test]
fn test_get_missing_key_exits_with_failure() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(temp_dir.path(), &["profiles", "get", "missing"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_invalid_json_prints_error_and_exits() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(temp_dir.path(), &["profiles", "set", "alice", "{age"]);
    assert!(!output.status.success(), "Expected invalid JSON to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Invalid JSON"),
        "Should print error message about invalid JSON: {}",
        stderr
    );
}

#[test]
fn test_all_fails_when_an_entry_is_corrupt() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    run_cli(temp_dir.path(), &["profiles", "set", "alice", r#"{"age":30}"#]);
    std::fs::write(temp_dir.path().join("profiles").join("broken"), b"{").unwrap();

    let output = run_cli(temp_dir.path(), &["profiles", "all"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("decode"));

    let output = run_cli(temp_dir.path(), &["profiles", "get", "alice"]);
    assert!(output.status.success());
}

#[test]
fn test_path_and_clear() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    run_cli(temp_dir.path(), &["profiles", "set", "a", "1"]);
    run_cli(temp_dir.path(), &["profiles", "set", "b", "2"]);

    let output = run_cli(temp_dir.path(), &["profiles", "path"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout)
        .trim()
        .ends_with("profiles"));

    let output = run_cli(temp_dir.path(), &["profiles", "clear"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Removed 2 entries"
    );
}

#[test]
fn test_invalid_namespace_reports_unusable_cache() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let output = run_cli(temp_dir.path(), &["..", "list"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unusable"));
}
