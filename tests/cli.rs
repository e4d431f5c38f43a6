//! Binary smoke tests. No test here reaches the real network.

use assert_cmd::Command;
use tempfile::TempDir;

fn painel(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("painel").unwrap();
    cmd.env("PAINEL_HOME", home.path())
        .env("PAINEL_ACTOR", "tester")
        .env_remove("PAINEL_DB")
        .env_remove("PAINEL_SHEETS_HOST")
        .env_remove("PAINEL_POLL_INTERVAL")
        .env_remove("PAINEL_NOTIFY_ENDPOINT")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout_of(cmd: &mut Command) -> String {
    let output = cmd.output().unwrap();
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    String::from_utf8(output.stdout).unwrap()
}

#[test]
fn version_reports_crate_version() {
    let home = TempDir::new().unwrap();
    let out = stdout_of(painel(&home).arg("version"));
    assert!(out.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn connect_rejects_invalid_url() {
    let home = TempDir::new().unwrap();
    let output = painel(&home)
        .args(["connect", "https://example.com/not-a-sheet"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(4));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("\"code\":\"INVALID_URL\""), "stderr: {stderr}");
    assert!(stderr.contains("\"retryable\":false"), "stderr: {stderr}");
    assert!(!home.path().join("session.json").exists());
}

#[test]
fn letters_require_a_connection() {
    let home = TempDir::new().unwrap();
    let output = painel(&home).arg("letters").output().unwrap();

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("NOT_CONNECTED"));
}

#[test]
fn unreachable_host_without_cache_fails() {
    let home = TempDir::new().unwrap();
    std::fs::write(
        home.path().join("config.json"),
        r#"{"sheetsHost": "http://127.0.0.1:9", "requestTimeoutSecs": 2}"#,
    )
    .unwrap();

    let output = painel(&home)
        .args(["connect", "https://docs.google.com/spreadsheets/d/abc123/edit"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(6));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("NO_SHEET_DATA"), "stderr: {stderr}");
    assert!(stderr.contains("CARTAS_DB"));

    let status = stdout_of(painel(&home).arg("status"));
    assert!(status.contains("connect_failed"), "status: {status}");
}

#[test]
fn config_set_then_show() {
    let home = TempDir::new().unwrap();
    stdout_of(painel(&home).args(["config", "set", "cacheTopN", "10"]));

    let out = stdout_of(painel(&home).args(["config", "show"]));
    let settings: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(settings["cacheTopN"], 10);
    assert_eq!(settings["pollIntervalSecs"], 60);
}

#[test]
fn config_set_unknown_key_fails() {
    let home = TempDir::new().unwrap();
    let output = painel(&home)
        .args(["config", "set", "colour", "blue"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn hidden_record_shows_in_status() {
    let home = TempDir::new().unwrap();
    stdout_of(painel(&home).args(["hide", "doc-1||19/10/2026 10:00:00|ana", "--label", "Ana"]));

    let out = stdout_of(painel(&home).arg("status"));
    let status: serde_json::Value = serde_json::from_str(out.trim()).unwrap();
    assert_eq!(status["connected_url"], serde_json::Value::Null);
    assert_eq!(status["excluded"][0]["label"], "Ana");
    assert_eq!(status["events"][0]["event_type"], "record_excluded");
}
