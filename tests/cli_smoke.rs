//! CLI smoke tests: flag parsing and help output of the built binary.

use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn test_help_lists_commands() {
    Command::cargo_bin("cofound")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("chat"))
        .stdout(predicate::str::contains("sessions"))
        .stdout(predicate::str::contains("board"))
        .stdout(predicate::str::contains("profile"));
}

#[test]
fn test_version() {
    Command::cargo_bin("cofound")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("cofound"));
}

#[test]
fn test_missing_subcommand_fails() {
    Command::cargo_bin("cofound")
        .unwrap()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_sessions_delete_requires_thread() {
    Command::cargo_bin("cofound")
        .unwrap()
        .args(["sessions", "delete"])
        .assert()
        .failure();
}
