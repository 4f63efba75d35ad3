//! Output formatter integration tests.
//!
//! Tests for terminal, JSON and JUnit rendering of complete session reports.

use crate::mocks::fixtures::ProjectFixture;
use crate::mocks::validator::{MockOutcome, MockValidator};
use pylembic_preflight::cli::output::{JsonFormatter, JunitFormatter, OutputFormatter, TerminalFormatter};
use pylembic_preflight::cli::summary::{FAILURE_LINE, FOOTER, HEADER, SUCCESS_LINE, VERBOSE_HINT};
use pylembic_preflight::config::{Configuration, SessionOptions};
use pylembic_preflight::engine::orchestrator::OrchestratorConfig;
use pylembic_preflight::engine::result::SessionReport;
use pylembic_preflight::run_session;
use pylembic_preflight::validator::MigrationValidator;
use std::sync::Arc;

fn session(
    project: &ProjectFixture,
    options: SessionOptions,
    validator: Arc<dyn MigrationValidator>,
) -> (SessionReport, Configuration) {
    let config = Configuration::resolve(&options, project.root());
    let report = run_session(&config, Vec::new(), validator, OrchestratorConfig::default());
    (report, config)
}

// Terminal formatter tests

#[test]
fn test_terminal_success_block_follows_listing() {
    let project = ProjectFixture::linear();
    let (report, config) = session(&project, SessionOptions::default(), MockValidator::valid());

    let output = TerminalFormatter::new(false, false).format(&report, &config).unwrap();

    assert!(output.starts_with("collected 1 check(s)"));
    assert!(output.contains("[PASS] pylembic_migrations"));
    let listing = output.find("SUMMARY:").unwrap();
    let header = output.find(HEADER).unwrap();
    assert!(listing < header);
    assert!(output.contains(VERBOSE_HINT));
    assert!(output.contains(SUCCESS_LINE));
    assert!(output.trim_end().ends_with('='));
    assert!(output.contains(FOOTER));
}

#[test]
fn test_terminal_failure_reported_twice() {
    let project = ProjectFixture::linear();
    let (report, config) = session(&project, SessionOptions::default(), MockValidator::invalid());

    let output = TerminalFormatter::new(false, false).format(&report, &config).unwrap();

    assert!(output.contains("[FAIL] pylembic_migrations"));
    assert!(output.contains(FAILURE_LINE));
    assert!(!output.contains(SUCCESS_LINE));
}

#[test]
fn test_terminal_skip_has_no_block() {
    let project = ProjectFixture::linear();
    let options = SessionOptions {
        skip: true,
        ..SessionOptions::default()
    };
    let (report, config) = session(&project, options, MockValidator::valid());

    let output = TerminalFormatter::new(false, false).format(&report, &config).unwrap();

    assert!(output.starts_with("collected 0 check(s)"));
    assert!(!output.contains(HEADER));
}

#[test]
fn test_terminal_verbose_hides_hint() {
    let project = ProjectFixture::linear();
    let options = SessionOptions {
        verbose: true,
        ..SessionOptions::default()
    };
    let (report, config) = session(&project, options, MockValidator::valid());

    let output = TerminalFormatter::new(false, false).format(&report, &config).unwrap();

    assert!(output.contains(HEADER));
    assert!(!output.contains(VERBOSE_HINT));
}

#[test]
fn test_terminal_quiet_hides_passes() {
    let project = ProjectFixture::linear();
    let (report, config) = session(&project, SessionOptions::default(), MockValidator::valid());

    let output = TerminalFormatter::new(false, true).format(&report, &config).unwrap();

    assert!(!output.contains("[PASS]"));
    assert!(output.contains(SUCCESS_LINE));
}

// JSON formatter tests

#[test]
fn test_json_contains_migrations_summary() {
    let project = ProjectFixture::linear();
    let (report, config) = session(&project, SessionOptions::default(), MockValidator::invalid());

    let output = JsonFormatter::new(false).format(&report, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert_eq!(value["summary"]["failed"], 1);
    assert_eq!(value["checks"][0]["id"], "pylembic_migrations");
    assert_eq!(value["checks"][0]["kind"], "migrations");
    assert_eq!(value["checks"][0]["result"]["status"], "fail");
    assert_eq!(value["migrations"]["ran"], true);
    assert_eq!(value["migrations"]["passed"], false);
}

#[test]
fn test_json_omits_migrations_when_skipped() {
    let project = ProjectFixture::linear();
    let options = SessionOptions {
        skip: true,
        ..SessionOptions::default()
    };
    let (report, config) = session(&project, options, MockValidator::valid());

    let output = JsonFormatter::new(true).format(&report, &config).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    assert!(value.get("migrations").is_none());
    assert_eq!(value["summary"]["total"], 0);
}

// JUnit formatter tests

#[test]
fn test_junit_failure_and_captured_output() {
    let project = ProjectFixture::linear();
    let options = SessionOptions {
        verbose: true,
        ..SessionOptions::default()
    };
    let validator = Arc::new(
        MockValidator::new(MockOutcome::Invalid)
            .with_trace(&["Multiple heads detected: <a>, <b>"]),
    );
    let (report, config) = session(&project, options, validator);

    let output = JunitFormatter::new().format(&report, &config).unwrap();

    assert!(output.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(output.contains("<testsuite name=\"pylembic-preflight\" tests=\"1\" failures=\"1\""));
    assert!(output.contains("<failure message=\"Migrations validation failed\">"));
    assert!(output.contains("<system-out>Multiple heads detected: &lt;a&gt;, &lt;b&gt;</system-out>"));
    assert!(output.ends_with("</testsuites>"));
}
