//! Integration tests for the `wiredctl` CLI binary.
//!
//! These tests cover argument parsing, shell completions, offline document
//! validation and the error paths that fire before any controller contact.
#![allow(clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a [`Command`] for the `wiredctl` binary with env isolation.
///
/// Clears all `WIREDCTL_*` env vars and points config directories at an
/// empty temp dir so tests never touch the user's real configuration.
fn wiredctl_cmd(home: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("wiredctl");
    cmd.env("HOME", home.path())
        .env("XDG_CONFIG_HOME", home.path())
        .env("NO_COLOR", "1")
        .env_remove("WIREDCTL_PROFILE")
        .env_remove("WIREDCTL_CONTROLLER")
        .env_remove("WIREDCTL_USERNAME")
        .env_remove("WIREDCTL_PASSWORD")
        .env_remove("WIREDCTL_OUTPUT")
        .env_remove("WIREDCTL_INSECURE")
        .env_remove("WIREDCTL_TIMEOUT")
        .env_remove("RUST_LOG");
    cmd
}

fn write_doc(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

const VALID_DOC: &str = r"
ip_address: 10.0.0.1
layer2_configuration:
  vlans:
    - vlan_id: 100
      vlan_name: SALES
    - vlan_id: 200
  stp:
    stp_mode: rstp
";

// ── Basic invocation ────────────────────────────────────────────────

#[test]
fn no_args_shows_help() {
    let home = TempDir::new().unwrap();
    let output = wiredctl_cmd(&home).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    let text = format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(text.contains("Usage"), "expected usage in:\n{text}");
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home).arg("--help").assert().success().stdout(
        predicate::str::contains("apply")
            .and(predicate::str::contains("delete"))
            .and(predicate::str::contains("plan"))
            .and(predicate::str::contains("validate")),
    );
}

#[test]
fn version_flag() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("wiredctl"));
}

// ── Shell completions ───────────────────────────────────────────────

#[test]
fn completions_zsh() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home)
        .args(["completions", "zsh"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#compdef"));
}

#[test]
fn completions_bash() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty().not());
}

// ── Offline validation ──────────────────────────────────────────────

#[test]
fn validate_accepts_valid_document() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    wiredctl_cmd(&home)
        .arg("validate")
        .arg(&doc)
        .assert()
        .success()
        .stdout(
            predicate::str::contains("is valid")
                .and(predicate::str::contains("10.0.0.1"))
                .and(predicate::str::contains("vlans, stp")),
        );
}

#[test]
fn validate_json_output_lists_features() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    let output = wiredctl_cmd(&home)
        .args(["validate", "-o", "json"])
        .arg(&doc)
        .output()
        .unwrap();
    assert!(output.status.success());
    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["features"], serde_json::json!(["vlans", "stp"]));
    assert_eq!(body["state"], "merged");
}

#[test]
fn validate_accepts_json_documents() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(
        &home,
        "sw1.json",
        r#"{"hostname": "sw1", "layer2_configuration": {"cdp": {"cdp_admin_status": true}}}"#,
    );
    wiredctl_cmd(&home)
        .args(["validate", "-o", "plain"])
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("cdp"));
}

#[test]
fn validate_rejects_out_of_range_vlan() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(
        &home,
        "bad.yaml",
        "ip_address: 10.0.0.1\nlayer2_configuration:\n  vlans:\n    - vlan_id: 5000\n",
    );
    wiredctl_cmd(&home)
        .arg("validate")
        .arg(&doc)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("vlan_id"));
}

#[test]
fn validate_rejects_unknown_feature() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(
        &home,
        "bad.yaml",
        "ip_address: 10.0.0.1\nlayer2_configuration:\n  wireless: {}\n",
    );
    wiredctl_cmd(&home)
        .arg("validate")
        .arg(&doc)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("wireless"));
}

#[test]
fn validate_requires_device_selector() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(
        &home,
        "bad.yaml",
        "layer2_configuration:\n  cdp:\n    cdp_admin_status: true\n",
    );
    wiredctl_cmd(&home)
        .arg("validate")
        .arg(&doc)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("hostname"));
}

#[test]
fn missing_document_is_a_usage_error() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home)
        .args(["validate", "/nonexistent/wiredctl/doc.yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Cannot read document"));
}

// ── Pre-connection errors ───────────────────────────────────────────

#[test]
fn delete_without_yes_requires_confirmation() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    wiredctl_cmd(&home)
        .arg("delete")
        .arg(&doc)
        .write_stdin("")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("requires confirmation"));
}

#[test]
fn apply_without_config_reports_missing_config() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    wiredctl_cmd(&home)
        .arg("apply")
        .arg(&doc)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Configuration file not found"));
}

#[test]
fn apply_without_username_is_an_auth_error() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    wiredctl_cmd(&home)
        .args(["apply", "--controller", "https://127.0.0.1:9"])
        .arg(&doc)
        .assert()
        .code(3)
        .stderr(predicate::str::contains("No credentials"));
}

#[test]
fn apply_with_unknown_profile_is_not_found() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(&home, "sw1.yaml", VALID_DOC);
    wiredctl_cmd(&home)
        .args(["apply", "--profile", "nope"])
        .arg(&doc)
        .assert()
        .code(4)
        .stderr(predicate::str::contains("nope"));
}

#[test]
fn invalid_document_fails_before_config_lookup() {
    let home = TempDir::new().unwrap();
    let doc = write_doc(
        &home,
        "bad.yaml",
        "ip_address: 10.0.0.1\nlayer2_configuration:\n  vlans:\n    - vlan_id: 0\n",
    );
    wiredctl_cmd(&home)
        .args(["apply", "--profile", "nope"])
        .arg(&doc)
        .assert()
        .code(2);
}

#[test]
fn show_requires_device() {
    let home = TempDir::new().unwrap();
    wiredctl_cmd(&home)
        .arg("show")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("--ip").or(predicate::str::contains("--hostname")));
}
