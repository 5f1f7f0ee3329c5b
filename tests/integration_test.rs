// tests/integration_test.rs
use std::process::{Command, Output};

fn release_train(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_release-train"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_release_train_help() {
    let output = release_train(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-train"));
    assert!(stdout.contains("--from-step"));
    assert!(stdout.contains("--version"));
}

#[test]
fn test_list_components() {
    let output = release_train(&["--list", "--config", "tests/fixtures/release-train.toml"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("1. core"));
    assert!(stdout.contains("2. identity (depends on core)"));
}

#[test]
fn test_version_is_required() {
    let output = release_train(&[]);
    assert!(!output.status.success());
}

#[test]
fn test_invalid_version_rejected() {
    let output = release_train(&[
        "--version",
        "1.2",
        "--config",
        "tests/fixtures/release-train.toml",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Invalid input"));
}

#[test]
fn test_unknown_from_step_rejected() {
    let output = release_train(&[
        "--version",
        "v1.0.0",
        "--from-step",
        "does-not-exist",
        "--config",
        "tests/fixtures/release-train.toml",
    ]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Unknown component 'does-not-exist'"));
    assert!(stderr.contains("core, identity"));
}
