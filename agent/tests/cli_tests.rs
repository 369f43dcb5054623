//! Integration tests for the fleet-agent binary.

#![allow(clippy::expect_used, deprecated)]

use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn agent() -> Command {
    Command::cargo_bin("fleet-agent").expect("fleet-agent binary should exist")
}

/// Lay out a base dir with a settings file pointing at a local blobstore.
fn base_dir() -> TempDir {
    let dir = TempDir::new().expect("tempdir");
    let agent_dir = dir.path().join("agent");
    std::fs::create_dir_all(agent_dir.join("log")).expect("mkdir");
    std::fs::write(agent_dir.join("log").join("current"), "agent started\n").expect("log");
    let settings = serde_json::json!({
        "agent_id": "agent-cli",
        "blobstore": {
            "provider": "local",
            "options": {"blobstore_path": dir.path().join("blobs")}
        },
        "networks": {"default": {"default": ["gateway"], "ip": "10.1.2.3"}},
        "vm": {"name": "vm-cli"}
    });
    std::fs::write(agent_dir.join("settings.json"), settings.to_string()).expect("settings");
    dir
}

fn invoke(base: &Path, method: &str) -> Command {
    let mut cmd = agent();
    cmd.env("FLEET_AGENT_BASE_DIR", base)
        .env_remove("FLEET_AGENT_SETTINGS_PATH")
        .args(["invoke", method]);
    cmd
}

#[test]
fn no_args_shows_help() {
    agent()
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn actions_lists_the_six_methods() {
    agent()
        .arg("actions")
        .assert()
        .success()
        .stdout("apply\nfetch_logs\nget_state\nget_task\nping\nssh\n");
}

#[test]
fn invoke_ping_prints_pong() {
    let base = base_dir();
    invoke(base.path(), "ping")
        .assert()
        .success()
        .stdout("\"pong\"\n");
}

#[test]
fn invoke_unknown_method_fails() {
    let base = base_dir();
    invoke(base.path(), "reboot")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown action 'reboot'"));
}

#[test]
fn apply_then_get_state_reports_spec() {
    let base = base_dir();
    invoke(base.path(), "apply")
        .args(["--args", r#"[{"deployment":"cf","job":{"name":"router"}}]"#])
        .assert()
        .success()
        .stdout("\"applied\"\n");

    let output = invoke(base.path(), "get_state")
        .output()
        .expect("run get_state");
    assert!(output.status.success());
    let state: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(state["deployment"], "cf");
    assert_eq!(state["agent_id"], "agent-cli");
    assert_eq!(state["job_state"], "running");
    assert_eq!(state["vm"]["name"], "vm-cli");
}

#[test]
fn fetch_agent_logs_uploads_to_local_blobstore() {
    let base = base_dir();
    let output = invoke(base.path(), "fetch_logs")
        .args(["--args", r#"["agent"]"#])
        .output()
        .expect("run fetch_logs");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let reply: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let blob_id = reply["blobstore_id"].as_str().expect("blob id");
    assert!(base.path().join("blobs").join(blob_id).is_file());
}

#[test]
fn invalid_args_json_is_rejected() {
    let base = base_dir();
    invoke(base.path(), "ping")
        .args(["--args", "{}"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON array"));
}

#[test]
fn missing_settings_file_fails() {
    let base = TempDir::new().expect("tempdir");
    invoke(base.path(), "ping")
        .assert()
        .failure()
        .stderr(predicate::str::contains("settings"));
}
