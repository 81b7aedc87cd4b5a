//! Integration tests for the `munin` CLI binary.
//!
//! Argument parsing, help output, completions, config handling and error
//! exit codes; nothing here needs a live backend.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// A `munin` command with env isolation: every `MUNIN_*` variable is
/// cleared and config directories point into `home`.
fn munin_cmd(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("munin");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "MUNIN_PROFILE",
        "MUNIN_SERVER",
        "MUNIN_API_URL",
        "MUNIN_USER",
        "MUNIN_TOKEN",
        "MUNIN_OUTPUT",
        "MUNIN_INSECURE",
        "MUNIN_TIMEOUT",
        "MUNIN_LINK_BASE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn combined_output(output: &std::process::Output) -> String {
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    format!("{stdout}{stderr}")
}

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn test_no_args_shows_help() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path()).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Usage"));
}

#[test]
fn test_help_lists_panels() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(
            predicate::str::contains("connections")
                .and(predicate::str::contains("metrics"))
                .and(predicate::str::contains("projects"))
                .and(predicate::str::contains("rules")),
        );
}

#[test]
fn test_version_flag() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("munin"));
}

#[test]
fn test_entity_help_lists_operations() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .args(["metrics", "--help"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains("list")
                .and(predicate::str::contains("create"))
                .and(predicate::str::contains("edit"))
                .and(predicate::str::contains("delete"))
                .and(predicate::str::contains("lookups")),
        );
}

#[test]
fn test_unknown_output_format_is_usage_error() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["--output", "xml", "projects", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn test_completions_bash() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("munin"));
}

// ── Configuration ───────────────────────────────────────────────────

#[test]
fn test_config_path_is_under_config_home() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_config_set_then_profiles() {
    let home = tempfile::tempdir().unwrap();
    munin_cmd(home.path())
        .args(["config", "set", "server", "https://console.example.net"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Set server on profile 'default'"));

    munin_cmd(home.path())
        .args(["--output", "plain", "config", "profiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("default"));

    munin_cmd(home.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("server = \"https://console.example.net\""));
}

#[test]
fn test_config_set_rejects_unknown_key() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["config", "set", "site", "x"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("unknown config key"));
}

#[test]
fn test_config_use_unknown_profile() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["config", "use", "prod"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("prod"));
}

// ── Errors before any request ───────────────────────────────────────

#[test]
fn test_panel_without_config_explains_setup() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["projects", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("munin config init"));
}

#[test]
fn test_missing_profile_is_reported() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["--profile", "ghost", "metrics", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("ghost"));
}

#[test]
fn test_create_rejects_malformed_assignment() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args([
            "--server",
            "http://127.0.0.1:9",
            "projects",
            "create",
            "--set",
            "no-equals-sign",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("expected path=value"));
}

#[test]
fn test_create_validates_draft_locally() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args([
            "--server",
            "http://127.0.0.1:9",
            "projects",
            "create",
            "--set",
            "name=bad name",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("Unable to create project."));
}

#[test]
fn test_delete_without_terminal_requires_yes() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["--server", "http://127.0.0.1:9", "rules", "delete", "cpu.high"])
        .write_stdin("")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(combined_output(&output).contains("--yes"));
}

#[test]
fn test_unreachable_backend_is_connection_error() {
    let home = tempfile::tempdir().unwrap();
    let output = munin_cmd(home.path())
        .args(["--server", "http://127.0.0.1:9", "--timeout", "2", "projects", "list"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(7));
    assert!(combined_output(&output).contains("Unable to retrieve projects."));
}
