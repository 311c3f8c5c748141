//! End-to-end tests for CLI exit codes.
//!
//! - Exit code 0: Success
//! - Exit code 1: General error (unreadable central config, missing org)
//! - Exit code 2: Invalid command-line usage (handled by clap)
//!
//! Per-repository failures during an org-wide pass are logged and
//! isolated by the library and never surface as an exit code; these
//! tests only exercise the top-level failures that do.

use assert_cmd::cargo::cargo_bin_cmd;
use assert_fs::prelude::*;
use predicates::prelude::*;

/// Exit code 0 is returned for --help.
#[test]
fn test_exit_code_help() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("--help").assert().code(0);
}

/// Exit code 0 is returned for --version.
#[test]
fn test_exit_code_version() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("--version").assert().code(0);
}

/// Exit code 1 is returned for configuration file not found.
#[test]
fn test_exit_code_error_config_not_found() {
    let temp = assert_fs::TempDir::new().unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.current_dir(temp.path())
        .arg("managed-files")
        .arg("--github-org")
        .arg("acme")
        .arg("--config")
        .arg("nonexistent.yaml")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration parsing error"));
}

/// Exit code 1 is returned for invalid YAML in the central config.
#[test]
fn test_exit_code_error_invalid_yaml() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_file = temp.child("config.yaml");

    config_file.write_str("files: [unclosed\n").unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.current_dir(temp.path())
        .arg("managed-files")
        .arg("--github-org")
        .arg("acme")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .code(1);
}

/// Exit code 1 is returned when no organization is given.
#[test]
fn test_exit_code_error_missing_org() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config_file = temp.child("config.yaml");

    config_file.write_str("variables: {}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.current_dir(temp.path())
        .env_remove("GITHUB_ORG")
        .arg("managed-files")
        .arg("--config")
        .arg(config_file.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("organization"));
}

/// Exit code 2 is returned for unknown command-line flags (handled by clap).
#[test]
fn test_exit_code_usage_unknown_flag() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("--unknown-flag-that-does-not-exist")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

/// Exit code 2 is returned for unknown subcommand.
#[test]
fn test_exit_code_usage_unknown_subcommand() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("unknown-subcommand-xyz")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}

/// Exit code 2 is returned when debug-repo is missing its required flag.
#[test]
fn test_exit_code_usage_debug_repo_missing_repo() {
    let mut cmd = cargo_bin_cmd!("repo-steward");

    cmd.arg("debug-repo")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error:"));
}
