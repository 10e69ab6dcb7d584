//! Smoke tests for the fixdom CLI

#![allow(deprecated)] // Allow deprecated Command::cargo_bin until assert_cmd is updated
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command for the fixdom binary, isolated from the caller's env
fn fixdom() -> Command {
    let mut cmd = Command::cargo_bin("fixdom").expect("fixdom binary should exist");
    cmd.env_remove("FIXDOM_FIXTURES_PATH")
        .env_remove("FIXDOM_CONTAINER_ID")
        .env_remove("FIXDOM_FETCH_ERRORS")
        .env_remove("RUST_LOG");
    cmd
}

/// A project directory with `spec/javascripts/fixtures/*.html`
fn project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let fixtures = dir.path().join("spec/javascripts/fixtures");
    fs::create_dir_all(&fixtures).unwrap();
    fs::write(
        fixtures.join("form.html"),
        "<form><input id=\"name\" class=\"field\" value=\"Ada\"><input id=\"ok\" type=\"checkbox\" checked></form>",
    )
    .unwrap();
    fs::write(
        fixtures.join("hidden.html"),
        "<div id=\"h\" style=\"display: none\">x</div>",
    )
    .unwrap();
    dir
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    fixdom()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.4.0"));
}

#[test]
fn test_help_flag() {
    fixdom()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("read"))
        .stdout(predicate::str::contains("preload"))
        .stdout(predicate::str::contains("assert"));
}

#[test]
fn test_no_args_shows_help() {
    fixdom().assert().failure();
}

#[test]
fn test_matchers_lists_names() {
    fixdom()
        .arg("matchers")
        .assert()
        .success()
        .stdout(predicate::str::contains("have-class"))
        .stdout(predicate::str::contains("handle-with"));
}

// ============================================================================
// read / preload
// ============================================================================

#[test]
fn test_read_prints_fixture() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["read", "hidden.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<div id=\"h\""));
}

#[test]
fn test_read_missing_fixture_fails() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["read", "nope.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_read_missing_fixture_suppressed() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["read", "nope.html", "--fetch-errors", "suppress"])
        .assert()
        .success();
}

#[test]
fn test_preload_reports_count() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args([
            "--color",
            "never",
            "preload",
            "form.html",
            "hidden.html",
            "form.html",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("preloaded 2 of 2"));
}

#[test]
fn test_fixtures_path_from_env() {
    let dir = project();
    fs::create_dir_all(dir.path().join("other")).unwrap();
    fs::write(dir.path().join("other/x.html"), "<p>other</p>").unwrap();
    fixdom()
        .current_dir(dir.path())
        .env("FIXDOM_FIXTURES_PATH", "other")
        .args(["read", "x.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<p>other</p>"));
}

#[test]
fn test_config_file_in_working_directory() {
    let dir = project();
    fs::create_dir_all(dir.path().join("fx")).unwrap();
    fs::write(dir.path().join("fx/y.html"), "<b>y</b>").unwrap();
    fs::write(dir.path().join("fixdom.yaml"), "fixtures_path: fx\n").unwrap();
    fixdom()
        .current_dir(dir.path())
        .args(["read", "y.html"])
        .assert()
        .success()
        .stdout(predicate::str::contains("<b>y</b>"));
}

#[test]
fn test_invalid_config_file_fails() {
    let dir = project();
    fs::write(dir.path().join("bad.yaml"), "container_id: \"\"\n").unwrap();
    fixdom()
        .current_dir(dir.path())
        .args(["--config", "bad.yaml", "read", "form.html"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("container_id"));
}

// ============================================================================
// assert
// ============================================================================

#[test]
fn test_assert_passes() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args([
            "--color",
            "never",
            "assert",
            "form.html",
            "-s",
            "#name",
            "-m",
            "toHaveValue",
            "-a",
            "Ada",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("PASS"));
}

#[test]
fn test_assert_fails_with_message() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args([
            "assert",
            "form.html",
            "-s",
            "#name",
            "-m",
            "have-class",
            "-a",
            "other",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Assertion failed"))
        .stderr(predicate::str::contains("to have class"));
}

#[test]
fn test_assert_negated() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["assert", "hidden.html", "-s", "#h", "-m", "be-visible", "--not"])
        .assert()
        .success();
}

#[test]
fn test_assert_checked() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["-q", "assert", "form.html", "-s", "#ok", "-m", "toBeChecked"])
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_assert_unknown_matcher() {
    let dir = project();
    fixdom()
        .current_dir(dir.path())
        .args(["assert", "form.html", "-s", "#name", "-m", "toSparkle"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid argument"));
}
