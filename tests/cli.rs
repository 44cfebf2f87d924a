//! CLI smoke tests.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_lists_the_command_groups() {
    let mut cmd = Command::cargo_bin("square-rs").expect("binary should build");
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("auth"))
        .stdout(predicate::str::contains("customers"))
        .stdout(predicate::str::contains("groups"))
        .stdout(predicate::str::contains("segments"));
}

#[test]
fn config_show_works_with_an_isolated_config_dir() {
    let temp_dir = tempfile::tempdir().expect("temp dir");

    let mut cmd = Command::cargo_bin("square-rs").expect("binary should build");
    cmd.env_remove("SQUARE_ACCESS_TOKEN")
        .arg("--config-dir")
        .arg(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profiles"));
}

#[test]
fn unknown_environment_in_config_set_is_rejected() {
    let temp_dir = tempfile::tempdir().expect("temp dir");

    let mut cmd = Command::cargo_bin("square-rs").expect("binary should build");
    cmd.env_remove("SQUARE_ACCESS_TOKEN")
        .arg("--config-dir")
        .arg(temp_dir.path())
        .args(["config", "set", "environment", "staging"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sandbox"));
}
