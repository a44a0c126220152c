use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("ocenv").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Object-centric vectorized environments for RL",
        ));
}

#[test]
fn test_cli_list() {
    let mut cmd = Command::cargo_bin("ocenv").unwrap();
    cmd.arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Available environments:"))
        .stdout(predicate::str::contains("paddleball"));
}

#[test]
fn test_cli_focus_default_concept() {
    let mut cmd = Command::cargo_bin("ocenv").unwrap();
    cmd.arg("focus")
        .arg("ALE/Pong-v5")
        .assert()
        .success()
        .stdout(predicate::str::contains("pong.yaml"));
}

#[test]
fn test_cli_focus_unknown_concept_fails() {
    let mut cmd = Command::cargo_bin("ocenv").unwrap();
    cmd.arg("focus")
        .arg("ALE/Pong-v5")
        .arg("--concept")
        .arg("bogus")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown prune concept"));
}

#[test]
fn test_cli_demo_records_log() {
    let dir = tempfile::tempdir().unwrap();
    let log_dir = dir.path().join("run");

    let mut cmd = Command::cargo_bin("ocenv").unwrap();
    cmd.arg("demo")
        .arg("--num-envs")
        .arg("2")
        .arg("--steps")
        .arg("80")
        .arg("--log-dir")
        .arg(&log_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("Ran 80 steps"));

    assert!(log_dir.join("logger.log").exists());
}
