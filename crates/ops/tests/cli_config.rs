//! Integration tests for `ops config` against an isolated config directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_ops(config_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_ops"))
        .env("OPS_TOOLKIT_CONFIG_DIR", config_dir)
        .args(args)
        .output()
        .expect("Failed to execute 'ops'")
}

fn run_ops_ok(config_dir: &Path, args: &[&str]) -> String {
    let output = run_ops(config_dir, args);
    assert!(
        output.status.success(),
        "ops {:?} failed with exit code {:?}. stderr: {}",
        args,
        output.status.code(),
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn backup_count(config_dir: &Path) -> usize {
    match fs::read_dir(config_dir.join("backups")) {
        Ok(entries) => entries.count(),
        Err(_) => 0,
    }
}

#[test]
fn test_first_run_creates_default_file() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join("ops");

    let stdout = run_ops_ok(&config_dir, &["config", "get", "monitor.refreshInterval"]);

    assert_eq!(stdout.trim(), "5000");
    assert!(config_dir.join("config.json").is_file());
    assert!(config_dir.join("backups").is_dir());
}

#[test]
fn test_set_then_get_across_invocations() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();

    run_ops_ok(config_dir, &["config", "set", "monitor.refreshInterval", "10"]);
    let stdout = run_ops_ok(config_dir, &["config", "get", "monitor.refreshInterval", "--json"]);

    assert_eq!(stdout.trim(), "10");
    assert_eq!(backup_count(config_dir), 1);
}

#[test]
fn test_set_plain_string_value() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();

    run_ops_ok(config_dir, &["config", "set", "ui.theme", "dark"]);
    let stdout = run_ops_ok(config_dir, &["config", "get", "ui.theme", "--json"]);

    assert_eq!(stdout.trim(), "\"dark\"");
}

#[test]
fn test_invalid_set_is_rolled_back() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();
    run_ops_ok(config_dir, &["config", "get"]);
    let before = fs::read_to_string(config_dir.join("config.json")).unwrap();

    let output = run_ops(config_dir, &["config", "set", "monitor.maxProcesses", "0"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("[schema]"),
        "Expected validator name in stderr, got: {}",
        stderr
    );
    assert!(
        stderr.contains(r#""error_code":"CONFIG_VALIDATION_FAILED""#),
        "Expected error code in the failure event, got: {}",
        stderr
    );
    assert_eq!(
        fs::read_to_string(config_dir.join("config.json")).unwrap(),
        before
    );
}

#[test]
fn test_get_missing_key_fails() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");

    let output = run_ops(temp_dir.path(), &["config", "get", "does.not.exist"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("not found"));
}

#[test]
fn test_invalid_json_reports_load_failure() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();
    fs::write(config_dir.join("config.json"), "{ invalid json").unwrap();

    let output = run_ops(config_dir, &["config", "get"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Could not load configuration"),
        "Expected load failure in stderr, got: {}",
        stderr
    );
    assert!(
        stderr.contains("ops config reset --force"),
        "Expected recovery tip in stderr, got: {}",
        stderr
    );
}

#[test]
fn test_force_reset_recovers_invalid_json() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();
    fs::write(config_dir.join("config.json"), "{ invalid json").unwrap();

    let output = run_ops(config_dir, &["config", "reset"]);
    assert!(!output.status.success(), "Plain reset needs a loadable file");

    run_ops_ok(config_dir, &["config", "reset", "--force"]);

    let stdout = run_ops_ok(config_dir, &["config", "get", "deploy.defaultEnv"]);
    assert_eq!(stdout.trim(), "production");
    assert_eq!(backup_count(config_dir), 1);
}

#[test]
fn test_reset_backs_up_and_restores_defaults() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();

    run_ops_ok(config_dir, &["config", "set", "deploy.defaultEnv", "staging"]);
    run_ops_ok(config_dir, &["config", "reset"]);

    let stdout = run_ops_ok(config_dir, &["config", "get", "deploy.defaultEnv"]);
    assert_eq!(stdout.trim(), "production");
    assert_eq!(backup_count(config_dir), 2);
}

#[test]
fn test_backups_clean_keeps_most_recent() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();

    for i in 0..4 {
        let value = (1000 + i).to_string();
        run_ops_ok(config_dir, &["config", "set", "monitor.refreshInterval", &value]);
    }
    assert_eq!(backup_count(config_dir), 4);

    let stdout = run_ops_ok(config_dir, &["config", "backups", "--clean", "--keep", "1"]);

    assert!(stdout.contains("Removed 3"), "got: {}", stdout);
    assert_eq!(backup_count(config_dir), 1);

    let listing = run_ops_ok(config_dir, &["config", "backups"]);
    assert!(listing.contains("config-backup-"));
    assert!(listing.contains("Total: 1"));
}

#[test]
fn test_path_uses_override() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path().join("custom");

    let stdout = run_ops_ok(&config_dir, &["config", "path"]);

    assert!(stdout.contains(&config_dir.join("config.json").display().to_string()));
    assert!(stdout.contains(&config_dir.join("backups").display().to_string()));
    // path never initializes
    assert!(!config_dir.exists());
}

#[test]
fn test_reload_and_validate_after_external_edit() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();
    run_ops_ok(config_dir, &["config", "get"]);

    fs::write(
        config_dir.join("config.json"),
        r#"{"ui":{"theme":"solarized"}}"#,
    )
    .unwrap();

    run_ops_ok(config_dir, &["config", "reload"]);
    let stdout = run_ops_ok(config_dir, &["config", "validate"]);
    assert!(stdout.contains("valid"));

    let theme = run_ops_ok(config_dir, &["config", "get", "ui.theme"]);
    assert_eq!(theme.trim(), "solarized");
}

#[test]
fn test_processes_refused_when_disabled() {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config_dir = temp_dir.path();
    run_ops_ok(config_dir, &["config", "set", "monitor.showProcesses", "false"]);

    let output = run_ops(config_dir, &["monitor", "processes"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("monitor.showProcesses"));
    assert!(
        stderr.contains(r#""error_code":"SYSTEM_PROCESS_LIST_DISABLED""#),
        "Expected error code in the refusal event, got: {}",
        stderr
    );
}
