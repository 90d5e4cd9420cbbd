//! Smoke tests for the qxprobe CLI
//!
//! Run the binary against snapshot files written to a temporary directory.

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const APP: &str = r"
location: http://localhost/app/index.html
application: app
clientDocument: doc
classes:
  qx.ui.core.Widget: { properties: [enabled] }
  qx.ui.form.Button: { extends: qx.ui.core.Widget, properties: [label] }
nodes:
  app: { members: { toolbar: { $ref: toolbar } } }
  doc: { class: qx.ui.core.Widget, enabled: enabled, children: [ { $ref: toolbar } ] }
  toolbar:
    class: qx.ui.core.Widget
    element: toolbarDiv
    enabled: inherit
    userData: { toolbar: true }
    children: [ { $ref: open }, { $ref: save } ]
  open: { class: qx.ui.form.Button, element: openDiv, enabled: inherit, properties: { label: Open }, userData: { open: true } }
  save: { class: qx.ui.form.Button, element: saveDiv, enabled: disabled, properties: { label: Save }, userData: { save: true } }
";

/// Get a command for the qxprobe binary
fn qxprobe() -> Command {
    Command::cargo_bin("qxprobe").expect("qxprobe binary should exist")
}

fn snapshot_file(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("app.yaml");
    fs::write(&path, APP).unwrap();
    path
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    qxprobe()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    qxprobe()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("locate"))
        .stdout(predicate::str::contains("enabled"))
        .stdout(predicate::str::contains("parse"));
}

#[test]
fn test_no_args_fails() {
    qxprobe().assert().failure();
}

// ============================================================================
// locate
// ============================================================================

#[test]
fn test_locate_hierarchy_path() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .args(["--color", "never", "locate"])
        .arg(&snapshot)
        .arg("qxh=app:toolbar/child[1]")
        .assert()
        .success()
        .stdout(predicate::str::contains("element saveDiv"));
}

#[test]
fn test_locate_user_tag_json() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    let output = qxprobe()
        .args(["--format", "json", "locate"])
        .arg(&snapshot)
        .arg("qx=toolbar")
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["node"], "toolbar");
    assert_eq!(value["element"], "toolbarDiv");
}

#[test]
fn test_locate_no_match_fails() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .args(["--color", "never", "locate"])
        .arg(&snapshot)
        .arg("qxh=*/missing")
        .assert()
        .failure()
        .stdout(predicate::str::contains("no match"));
}

#[test]
fn test_locate_syntax_error() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .arg("locate")
        .arg(&snapshot)
        .arg("qxh=toolbar/1bad")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Illegal step"));
}

#[test]
fn test_locate_missing_snapshot() {
    qxprobe()
        .args(["locate", "/nonexistent/app.yaml", "qx=toolbar"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error"));
}

// ============================================================================
// enabled
// ============================================================================

#[test]
fn test_enabled_inherited() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .arg("enabled")
        .arg(&snapshot)
        .arg("qx=toolbar/open")
        .assert()
        .success()
        .stdout(predicate::str::contains("true"));
}

#[test]
fn test_enabled_disabled_widget() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .arg("enabled")
        .arg(&snapshot)
        .arg("qx=save")
        .assert()
        .failure()
        .stdout(predicate::str::contains("false"));
}

#[test]
fn test_enabled_rejects_object_locator() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .arg("enabled")
        .arg(&snapshot)
        .arg("qxx=toolbar")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Bad qooxdoo-Locator-Syntax"));
}

#[test]
fn test_enabled_qxp_not_implemented() {
    let dir = TempDir::new().unwrap();
    let snapshot = snapshot_file(&dir);
    qxprobe()
        .arg("enabled")
        .arg(&snapshot)
        .arg("qxp=toolbar//div")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not implemented"));
}

// ============================================================================
// parse
// ============================================================================

#[test]
fn test_parse_steps() {
    qxprobe()
        .args(["--color", "never", "parse"])
        .arg("*/qx.ui.form.Button/child[2]")
        .assert()
        .success()
        .stdout(predicate::str::contains("wildcard"))
        .stdout(predicate::str::contains("class"))
        .stdout(predicate::str::contains("child[2]"));
}

#[test]
fn test_parse_illegal_step() {
    qxprobe()
        .args(["parse", "a/1bad"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("QPath: Illegal step: 1bad"));
}

#[test]
fn test_config_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("qxprobe.yaml");
    fs::write(&config, "cycle_guard: true\n").unwrap();
    qxprobe()
        .arg("--config")
        .arg(&config)
        .args(["parse", "a/b"])
        .assert()
        .success();
}
