//! Integration tests for `factory-agent read-log`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agent(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("factory-agent"));
    cmd.env("NO_COLOR", "1")
        .env("FACTORY_AGENT_SETTINGS", dir.path().join("settings.json"));
    cmd
}

#[test]
fn test_read_log_prints_content() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("a.log");
    std::fs::write(&log, "line one\nline two\n").unwrap();
    agent(&dir)
        .arg("read-log")
        .arg(&log)
        .assert()
        .success()
        .stdout("line one\nline two\n");
}

#[test]
fn test_read_log_json_reports_size_and_encoding() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("a.log");
    std::fs::write(&log, "héllo").unwrap();
    let output = agent(&dir)
        .arg("read-log")
        .arg(&log)
        .arg("--json")
        .output()
        .unwrap();
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(v["success"], true);
    assert_eq!(v["content"], "héllo");
    assert_eq!(v["size"], 6);
    assert_eq!(v["encoding"], "UTF-8");
}

#[test]
fn test_read_log_relative_path_uses_log_folder() {
    let dir = TempDir::new().unwrap();
    let logs = dir.path().join("logs");
    std::fs::create_dir_all(&logs).unwrap();
    std::fs::write(logs.join("today.log"), "from log folder").unwrap();
    let settings = serde_json::json!({
        "lineNumber": 1,
        "pcNumber": 1,
        "configFilePath": "c.ini",
        "logFilePath": logs.to_string_lossy(),
        "modelFolderPath": "models",
        "serverUrl": "http://server:5000",
    });
    std::fs::write(dir.path().join("settings.json"), settings.to_string()).unwrap();

    agent(&dir)
        .args(["read-log", "today.log"])
        .assert()
        .success()
        .stdout("from log folder");
}

#[test]
fn test_read_log_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.log");
    agent(&dir)
        .arg("read-log")
        .arg(&missing)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open file"));
}
