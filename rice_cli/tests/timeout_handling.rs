use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

fn config(dir: &tempfile::TempDir) -> std::path::PathBuf {
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[scale]\ntare_samples = 3\nread_timeout_ms = 5\n").unwrap();
    cfg
}

#[rstest]
fn self_check_timeout_is_explained() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("rice_cli").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("RICE_TEST_SIM_TIMEOUT", "1")
        .arg("--config")
        .arg(config(&dir))
        .arg("self-check");
    cmd.assert().code(1).stderr(predicate::str::contains(
        "What happened: Scale read timed out",
    ));
}

#[rstest]
fn self_check_timeout_as_json() {
    let dir = tempdir().unwrap();
    let out = Command::cargo_bin("rice_cli")
        .unwrap()
        .env("RICE_TEST_SIM_TIMEOUT", "1")
        .arg("--json")
        .arg("--config")
        .arg(config(&dir))
        .arg("self-check")
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
    let stderr = String::from_utf8(out.stderr).unwrap();
    let line = stderr.lines().last().expect("error line");
    let v: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(v["reason"], "Timeout");
}

#[rstest]
fn run_loop_survives_sensor_timeouts() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("rice_cli").unwrap();
    cmd.env_remove("RUST_LOG")
        .env("RICE_TEST_SIM_TIMEOUT", "1")
        .arg("--config")
        .arg(config(&dir))
        .args(["run", "--ticks", "5", "--tick-ms", "1", "--skip-loading-delay"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("run complete: 5 ticks"))
        .stderr(predicate::str::contains("scale read failed"));
}
