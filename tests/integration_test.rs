// tests/integration_test.rs
use std::fs;
use std::process::{Command, Output};

fn release_pr(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let mut command = Command::new(env!("CARGO_BIN_EXE_release-pr"));
    command
        .args(args)
        .env_remove("GITHUB_TOKEN")
        .env_remove("GITHUB_OUTPUT")
        .env_remove("INPUT_PRE-RELEASE")
        .env_remove("INPUT_RELEASE-AS")
        .env("GITHUB_ACTIONS", "true")
        .env("GITHUB_REPOSITORY", "octo/widgets")
        .env("GITHUB_SHA", "0123456789abcdef")
        // unroutable, so any accidental request fails fast
        .env("GITHUB_API_URL", "http://127.0.0.1:9");
    for (key, value) in envs {
        command.env(key, value);
    }
    command.output().expect("Failed to execute command")
}

#[test]
fn test_release_pr_help() {
    let output = release_pr(&["--help"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("release-pr"));
    assert!(stdout.contains("--pre-release"));
    assert!(stdout.contains("--release-as"));
}

#[test]
fn test_release_pr_version() {
    let output = release_pr(&["--version"], &[]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_token_fails_without_outputs() {
    let dir = tempfile::tempdir().unwrap();
    let output_file = dir.path().join("output");
    fs::write(&output_file, "").unwrap();

    let output = release_pr(
        &[],
        &[("GITHUB_OUTPUT", output_file.to_str().unwrap())],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::error::Configuration error: Missing GITHUB_TOKEN"));
    assert_eq!(fs::read_to_string(&output_file).unwrap(), "");
}

#[test]
fn test_invalid_pre_release_input_fails() {
    let output = release_pr(
        &["--pre-release", "te.st"],
        &[("GITHUB_TOKEN", "t0k3n")],
    );

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("::error::"));
    assert!(stdout.contains("te.st"));
}

#[test]
fn test_invalid_release_as_input_fails() {
    let output = release_pr(&[], &[("GITHUB_TOKEN", "t0k3n"), ("INPUT_RELEASE-AS", "next")]);

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("Invalid version: \"next\"."));
}
