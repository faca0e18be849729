//! Argument parsing, help, and version output.

#![allow(clippy::expect_used)]

use assert_cmd::Command;
use predicates::prelude::*;

fn agent() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("factory-agent"));
    cmd.env("NO_COLOR", "1");
    cmd
}

#[test]
fn test_cli_no_args_shows_help() {
    agent()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_cli_help_lists_commands() {
    agent()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("run"))
        .stdout(predicate::str::contains("register"))
        .stdout(predicate::str::contains("analyze"))
        .stdout(predicate::str::contains("read-log"));
}

#[test]
fn test_cli_version_flag() {
    agent()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_json() {
    let output = agent()
        .args(["version", "--json"])
        .output()
        .expect("run");
    assert!(output.status.success());
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["version"], env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_unknown_subcommand_fails() {
    agent()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_run_help_shows_once_flag() {
    agent()
        .args(["run", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--once"));
}
