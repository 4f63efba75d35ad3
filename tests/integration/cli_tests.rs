//! CLI integration tests.
//!
//! Runs the built binary inside fixture project roots and checks exit codes
//! and the rendered summary block.

use crate::mocks::fixtures::ProjectFixture;
use pylembic_preflight::cli::summary::{FAILURE_LINE, HEADER, SUCCESS_LINE};
use std::path::Path;
use std::process::{Command, Output};

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pylembic-preflight"))
        .args(args)
        .current_dir(dir)
        .env_remove("ALEMBIC_MIGRATIONS_DIR")
        .env_remove("PYLEMBIC_PREFLIGHT_FORMAT")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .output()
        .expect("run pylembic-preflight")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_linear_history_succeeds() {
    let project = ProjectFixture::linear();
    let output = run_in(project.root(), &["--pylembic-verbose"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains(HEADER));
    assert!(out.contains(SUCCESS_LINE));
    assert!(out.contains("Found 3 revision(s)"));
    assert!(!out.contains(FAILURE_LINE));
}

#[test]
fn test_unlinked_revisions_fail() {
    let project = ProjectFixture::with_migrations("migrations");
    project.add_revision("migrations", "aaa1", None);
    project.add_revision("migrations", "bbb2", None);

    let output = run_in(project.root(), &["--pylembic-verbose"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains(FAILURE_LINE));
    assert!(out.contains("Multiple heads detected: aaa1, bbb2"));
}

#[test]
fn test_branched_history_fails() {
    let project = ProjectFixture::branched();
    let output = run_in(project.root(), &["--pylembic-verbose"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(1));
    assert!(out.contains("[FAIL] pylembic_migrations"));
    assert!(out.contains(FAILURE_LINE));
    assert!(out.contains("Multiple heads detected: 0002a, 0002b"));
}

#[test]
fn test_branched_history_passes_without_detection() {
    let project = ProjectFixture::branched();
    let output = run_in(project.root(), &["--no-pylembic-detect-branches"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains(SUCCESS_LINE));
}

#[test]
fn test_skip_renders_no_block() {
    let project = ProjectFixture::branched();
    let output = run_in(project.root(), &["--skip-pylembic"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("collected 0 check(s)"));
    assert!(!out.contains(HEADER));
}

#[test]
fn test_absent_directory_has_no_verdict() {
    let project = ProjectFixture::empty();
    let output = run_in(project.root(), &[]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("No migrations directory found at"));
    assert!(!out.contains(SUCCESS_LINE));
    assert!(!out.contains(FAILURE_LINE));
}

#[test]
fn test_rootdir_and_custom_directory() {
    let project = ProjectFixture::with_migrations("alembic");
    project.add_revision("alembic", "0001", None);
    let elsewhere = ProjectFixture::empty();

    let root = project.root().to_string_lossy().into_owned();
    let output = run_in(
        elsewhere.root(),
        &["--rootdir", &root, "--alembic-migrations-dir", "alembic"],
    );

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).contains(SUCCESS_LINE));
}

#[test]
fn test_json_format() {
    let project = ProjectFixture::linear();
    let output = run_in(project.root(), &["--format", "json"]);
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();

    assert_eq!(output.status.code(), Some(0));
    assert_eq!(value["migrations"]["passed"], true);
}

#[test]
fn test_list_command() {
    let project = ProjectFixture::linear();
    let output = run_in(project.root(), &["list"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains("@pylembic"));
    assert!(out.contains("pylembic_migrations"));
}

#[test]
fn test_version_command() {
    let project = ProjectFixture::empty();
    let output = run_in(project.root(), &["version"]);

    assert_eq!(output.status.code(), Some(0));
    assert!(stdout(&output).starts_with("pylembic-preflight "));
}

#[test]
fn test_help_lists_options() {
    let project = ProjectFixture::empty();
    let output = run_in(project.root(), &["--help"]);
    let out = stdout(&output);

    assert_eq!(output.status.code(), Some(0));
    for option in [
        "--alembic-migrations-dir",
        "--skip-pylembic",
        "--pylembic-detect-branches",
        "--pylembic-verbose",
    ] {
        assert!(out.contains(option), "missing {} in help", option);
    }
}

#[test]
fn test_unknown_option_exits_with_usage_error() {
    let project = ProjectFixture::empty();
    let output = run_in(project.root(), &["--no-such-flag"]);
    assert_eq!(output.status.code(), Some(3));
}

#[test]
fn test_relative_rootdir_resolves_to_absolute_path() {
    let project = ProjectFixture::empty();
    let parent = project.root().parent().unwrap();
    let name = project.root().file_name().unwrap().to_string_lossy().into_owned();

    let output = run_in(parent, &["--rootdir", &name]);
    let out = stdout(&output);

    let expected = format!(
        "No migrations directory found at {}",
        project.root().join("migrations").display()
    );
    assert_eq!(output.status.code(), Some(0));
    assert!(out.contains(&expected), "unexpected output: {}", out);
}
