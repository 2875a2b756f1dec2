//! Integration tests for `mits run` without a reachable platform.

#![allow(clippy::expect_used)]

use predicates::prelude::*;

use super::cli_tests::{VALID_CONFIG, config_file, mits};

#[test]
fn test_run_rejects_unknown_test() {
    let (_dir, path) = config_file(VALID_CONFIG);
    mits()
        .args(["run", "--only", "cassandra", "--config"])
        .arg(&path)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unknown test 'cassandra'"));
}

#[test]
fn test_run_without_cf_reports_setup_failure() {
    let (dir, path) = config_file(VALID_CONFIG);
    let output = mits()
        .args(["run", "--json", "--config"])
        .arg(&path)
        .env("PATH", dir.path())
        .output()
        .expect("run");

    assert_eq!(output.status.code(), Some(1));
    let v: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(v["passed"], false);
    assert!(
        v["setup_error"]
            .as_str()
            .is_some_and(|e| e.contains("cf api")),
        "{v}"
    );
    assert_eq!(v["scenarios"], serde_json::json!([]));
}
