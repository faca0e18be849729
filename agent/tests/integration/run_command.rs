//! Integration tests for `factory-agent run`.
//!
//! Only paths that fail before or at the first heartbeat are exercised;
//! no server is started.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agent(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("factory-agent"));
    cmd.env("NO_COLOR", "1")
        .env("FACTORY_AGENT_SETTINGS", dir.path().join("settings.json"))
        .env("FACTORY_AGENT_HTTP_TIMEOUT_SECS", "2");
    cmd
}

#[test]
fn test_run_unregistered_fails() {
    let dir = TempDir::new().unwrap();
    agent(&dir)
        .args(["run", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_run_unregistered_json_error_code() {
    let dir = TempDir::new().unwrap();
    let output = agent(&dir)
        .args(["run", "--once", "--json"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], "NOT_REGISTERED");
}

#[test]
fn test_run_settings_without_pc_id_is_unregistered() {
    let dir = TempDir::new().unwrap();
    let settings = serde_json::json!({
        "lineNumber": 1,
        "pcNumber": 1,
        "configFilePath": "c.ini",
        "logFilePath": "logs",
        "modelFolderPath": "models",
        "serverUrl": "http://127.0.0.1:9",
    });
    std::fs::write(dir.path().join("settings.json"), settings.to_string()).unwrap();
    let output = agent(&dir)
        .args(["run", "--once", "--json"])
        .output()
        .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["code"], "NOT_REGISTERED");
}

#[test]
fn test_run_once_unreachable_server_fails() {
    let dir = TempDir::new().unwrap();
    let settings = serde_json::json!({
        "pcId": 7,
        "lineNumber": 1,
        "pcNumber": 1,
        "configFilePath": dir.path().join("c.ini").to_string_lossy(),
        "logFilePath": dir.path().to_string_lossy(),
        "modelFolderPath": dir.path().join("models").to_string_lossy(),
        "serverUrl": "http://127.0.0.1:9",
    });
    std::fs::write(dir.path().join("settings.json"), settings.to_string()).unwrap();
    agent(&dir)
        .args(["run", "--once"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("heartbeat failed"));
}
