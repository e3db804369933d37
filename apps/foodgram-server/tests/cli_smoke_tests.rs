#![allow(clippy::unwrap_used, clippy::expect_used, clippy::non_ascii_literal)]

//! CLI smoke tests for the foodgram-server binary
//!
//! These tests verify that the CLI commands work correctly, including
//! configuration validation, help output, and the maintenance commands.

use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

/// Helper to run the foodgram-server binary with given arguments
fn run_foodgram_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_foodgram-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute foodgram-server")
}

/// Helper to run the foodgram-server binary with timeout
async fn run_foodgram_server_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_foodgram-server"));
    cmd.args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let child = cmd.spawn()?;

    match timeout(timeout_duration, child.wait_with_output()).await {
        Ok(result) => result.map_err(Into::into),
        Err(_elapsed) => Err("elapsed".into()),
    }
}

fn write_config(dir: &TempDir, name: &str, content: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write config file");
    path.to_str().unwrap().to_owned()
}

#[test]
fn test_cli_help_command() {
    let output = run_foodgram_server(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    for subcommand in ["run", "check", "migrate", "load-ingredients"] {
        assert!(stdout.contains(subcommand), "Should list '{subcommand}'");
    }
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_foodgram_server(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("foodgram-server"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_foodgram_server(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report the error: {stderr}");
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_foodgram_server(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(
        !output.status.success(),
        "Should fail when config file doesn't exist"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("does not exist"),
        "Should indicate config file not found: {stderr}"
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "invalid.yaml", "invalid: yaml: content: [unclosed");

    let output = run_foodgram_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("failed to load configuration"),
        "Should mention configuration loading: {stderr}"
    );
}

#[test]
fn test_cli_config_rejects_unknown_keys() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(&temp_dir, "typo.yaml", "server:\n  bind_adress: 0.0.0.0:80\n");

    let output = run_foodgram_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Should fail on unknown keys");
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_content = r#"
server:
  bind_addr: "127.0.0.1:9999"
  public_base_url: "https://foodgram.example.com"
  request_timeout: 10s

database:
  dsn: "sqlite::memory:"

logging:
  level: "warn"
  format: json

auth:
  jwt_secret: "super-secret"

foodgram:
  default_page_size: 6
"#;
    let config_path = write_config(&temp_dir, "valid.yaml", config_content);

    let output = run_foodgram_server(&["--config", &config_path, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration is valid"));
    assert!(stdout.contains("127.0.0.1:9999"));
    assert!(
        !stdout.contains("super-secret"),
        "Secret must not be printed: {stdout}"
    );
}

#[test]
fn test_cli_check_rejects_bad_public_base_url() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        &temp_dir,
        "bad_url.yaml",
        "server:\n  public_base_url: \"not a url\"\n",
    );

    let output = run_foodgram_server(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Should fail with a bad base URL");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("public_base_url"), "{stderr}");
}

#[test]
fn test_cli_print_config_applies_overrides() {
    let output = Command::new(env!("CARGO_BIN_EXE_foodgram-server"))
        .args(["--print-config", "--port", "9123", "--mock"])
        .env("APP__FOODGRAM__MAX_PAGE_SIZE", "42")
        .output()
        .expect("Failed to execute foodgram-server");

    assert!(output.status.success(), "print-config should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration"));
    assert!(stdout.contains(":9123"), "Port override missing: {stdout}");
    assert!(stdout.contains("sqlite::memory:"), "Mock DSN missing: {stdout}");
    assert!(stdout.contains("max_page_size: 42"), "Env override missing: {stdout}");
}

#[test]
fn test_cli_migrate_in_mock_mode() {
    let output = run_foodgram_server(&["--mock", "migrate"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
    }
    assert!(output.status.success(), "migrate should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Migrations applied"));
}

#[test]
fn test_cli_migrate_creates_sqlite_file() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("foodgram.db");
    let config_content = format!(
        "database:\n  dsn: \"sqlite://{}?mode=rwc\"\n",
        db_path.to_string_lossy().replace('\\', "/")
    );
    let config_path = write_config(&temp_dir, "db.yaml", &config_content);

    let output = run_foodgram_server(&["--config", &config_path, "migrate"]);
    assert!(
        output.status.success(),
        "migrate should succeed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(db_path.exists(), "Database file should be created");

    // Running again is a no-op
    let output = run_foodgram_server(&["--config", &config_path, "migrate"]);
    assert!(output.status.success(), "second migrate should succeed");
}

#[test]
fn test_cli_load_ingredients_is_idempotent() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("foodgram.db");
    let config_content = format!(
        "database:\n  dsn: \"sqlite://{}?mode=rwc\"\n",
        db_path.to_string_lossy().replace('\\', "/")
    );
    let config_path = write_config(&temp_dir, "db.yaml", &config_content);
    let data_path = temp_dir.path().join("ingredients.json");
    std::fs::write(
        &data_path,
        r#"[{"name": "соль", "measurement_unit": "г"}, {"name": "молоко", "measurement_unit": "мл"}]"#,
    )
    .unwrap();
    let data = data_path.to_str().unwrap();

    let first = run_foodgram_server(&["--config", &config_path, "load-ingredients", "--file", data]);
    assert!(
        first.status.success(),
        "load should succeed: {}",
        String::from_utf8_lossy(&first.stderr)
    );
    assert!(String::from_utf8_lossy(&first.stdout).contains("2 created, 0 skipped"));

    let second = run_foodgram_server(&["--config", &config_path, "load-ingredients", "--file", data]);
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&second.stdout).contains("0 created, 2 skipped"));
}

#[test]
fn test_cli_load_ingredients_missing_file() {
    let output = run_foodgram_server(&[
        "--mock",
        "load-ingredients",
        "--file",
        "/nonexistent/ingredients.json",
    ]);

    assert!(!output.status.success(), "Should fail for a missing file");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ingredients.json"), "{stderr}");
}

#[test]
fn test_cli_bundled_catalog_loads() {
    let data = concat!(env!("CARGO_MANIFEST_DIR"), "/data/ingredients.json");
    let output = run_foodgram_server(&["--mock", "load-ingredients", "--file", data]);

    assert!(
        output.status.success(),
        "bundled catalog should load: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(String::from_utf8_lossy(&output.stdout).contains("0 skipped"));
}

#[test]
fn test_cli_bundled_config_is_valid() {
    let config = concat!(env!("CARGO_MANIFEST_DIR"), "/config/foodgram.yaml");
    let output = run_foodgram_server(&["--config", config, "check"]);

    assert!(
        output.status.success(),
        "bundled config should validate: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[tokio::test]
async fn test_cli_run_serves_until_stopped() {
    // Port 0 lets the OS pick a free port; the server keeps running until killed.
    let result = run_foodgram_server_with_timeout(
        &["--mock", "--port", "0", "run"],
        Duration::from_secs(3),
    )
    .await;

    match result {
        Err(e) => assert_eq!(e.to_string(), "elapsed", "Server should still be running"),
        Ok(output) => panic!(
            "Server exited early: {}",
            String::from_utf8_lossy(&output.stderr)
        ),
    }
}
