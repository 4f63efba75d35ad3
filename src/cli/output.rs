//! Output formatting for pylembic-preflight.
//!
//! Provides terminal, JSON, and JUnit XML output formatters.
//!
//! # Graceful Degradation
//!
//! - Non-TTY output: Color disabled via NO_COLOR or --no-color
//! - Empty sessions: Produce valid output with zero checks
//! - Skipped migrations check: Summary block and JSON `migrations` field omitted
//!
//! All formatters produce valid output for any SessionReport input.

use crate::cli::args::OutputFormat;
use crate::cli::summary::SummaryReporter;
use crate::config::Configuration;
use crate::engine::result::{summarize_migrations, ResultSummary, SessionReport, SessionSummary};
use crate::{Check, CheckResult, PreflightError};
use serde::Serialize;

/// Trait for output formatters
pub trait OutputFormatter {
    /// Format a session report into a string
    fn format(&self, report: &SessionReport, config: &Configuration) -> Result<String, PreflightError>;
}

/// Terminal (human-readable) formatter
pub struct TerminalFormatter {
    color: bool,
    quiet: bool,
}

impl TerminalFormatter {
    pub fn new(color: bool, quiet: bool) -> Self {
        TerminalFormatter { color, quiet }
    }

    fn colorize(&self, text: &str, color_code: &str) -> String {
        if self.color {
            format!("\x1b[{}m{}\x1b[0m", color_code, text)
        } else {
            text.to_string()
        }
    }

    fn status_line(&self, check: &Check) -> Option<String> {
        let line = match &check.result {
            Some(CheckResult::Pass { message, .. }) => {
                if self.quiet {
                    return None;
                }
                format!("{} {} ({})", self.colorize("[PASS]", "32"), check.name, message)
            }
            Some(CheckResult::Fail { message, details, .. }) => format!(
                "{} {} ({} - {})",
                self.colorize("[FAIL]", "31"),
                check.name,
                message,
                details
            ),
            Some(CheckResult::Skip { reason }) => {
                if self.quiet {
                    return None;
                }
                format!("{} {} ({})", self.colorize("[SKIP]", "90"), check.name, reason)
            }
            None => format!("{} {} (Not executed)", self.colorize("[----]", "90"), check.name),
        };
        Some(line)
    }
}

impl OutputFormatter for TerminalFormatter {
    fn format(&self, report: &SessionReport, config: &Configuration) -> Result<String, PreflightError> {
        let mut output = String::new();
        let summary = report.summary();

        output.push_str(&format!("collected {} check(s)\n\n", report.checks.len()));

        for check in &report.checks {
            if let Some(line) = self.status_line(check) {
                output.push_str(&format!("  {}\n", line));
            }
        }
        if !report.checks.is_empty() {
            output.push('\n');
        }

        output.push_str(&format!(
            "SUMMARY: {} passed, {} failed, {} skipped in {:.2}s\n",
            summary.passed,
            summary.failed,
            summary.skipped,
            report.total_duration_ms as f64 / 1000.0
        ));

        let reporter = SummaryReporter::new(self.color);
        let migrations = summarize_migrations(&report.stats());
        output.push_str(&reporter.render_to_string(config, &migrations, &report.synthesis));

        Ok(output.trim_end().to_string())
    }
}

/// JSON formatter
pub struct JsonFormatter {
    pretty: bool,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    total_duration_ms: u64,
    summary: ResultSummary,
    checks: &'a [Check],
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<SessionSummary>,
}

impl JsonFormatter {
    pub fn new(pretty: bool) -> Self {
        JsonFormatter { pretty }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &SessionReport, config: &Configuration) -> Result<String, PreflightError> {
        let body = JsonReport {
            total_duration_ms: report.total_duration_ms,
            summary: report.summary(),
            checks: &report.checks,
            migrations: (!config.skip).then(|| summarize_migrations(&report.stats())),
        };

        let json = if self.pretty {
            serde_json::to_string_pretty(&body)?
        } else {
            serde_json::to_string(&body)?
        };
        Ok(json)
    }
}

/// JUnit XML formatter
pub struct JunitFormatter;

impl JunitFormatter {
    pub fn new() -> Self {
        JunitFormatter
    }

    fn escape_xml(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        for c in s.chars() {
            match c {
                '&' => result.push_str("&amp;"),
                '<' => result.push_str("&lt;"),
                '>' => result.push_str("&gt;"),
                '"' => result.push_str("&quot;"),
                '\'' => result.push_str("&apos;"),
                c => result.push(c),
            }
        }
        result
    }
}

impl Default for JunitFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JunitFormatter {
    fn format(&self, report: &SessionReport, _config: &Configuration) -> Result<String, PreflightError> {
        let mut output = String::new();
        output.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");

        let summary = report.summary();
        let time = report.total_duration_ms as f64 / 1000.0;
        output.push_str(&format!(
            "<testsuites tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, summary.failed, summary.skipped, time
        ));
        output.push_str(&format!(
            "  <testsuite name=\"pylembic-preflight\" tests=\"{}\" failures=\"{}\" errors=\"0\" skipped=\"{}\" time=\"{:.3}\">\n",
            summary.total, summary.failed, summary.skipped, time
        ));

        for check in &report.checks {
            let duration_ms = match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => *duration_ms,
                Some(CheckResult::Fail { duration_ms, .. }) => *duration_ms,
                _ => 0,
            };

            output.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"pylembic-preflight\" time=\"{:.3}\"",
                Self::escape_xml(&check.name),
                duration_ms as f64 / 1000.0
            ));

            match &check.result {
                Some(CheckResult::Pass { .. }) => {
                    output.push_str(">\n");
                }
                Some(CheckResult::Fail { message, details, .. }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <failure message=\"{}\">{}</failure>\n",
                        Self::escape_xml(message),
                        Self::escape_xml(details)
                    ));
                }
                Some(CheckResult::Skip { reason }) => {
                    output.push_str(">\n");
                    output.push_str(&format!(
                        "      <skipped message=\"{}\" />\n",
                        Self::escape_xml(reason)
                    ));
                }
                None => {
                    output.push_str(" />\n");
                    continue;
                }
            }

            if let Some(ref captured) = check.captured {
                output.push_str(&format!(
                    "      <system-out>{}</system-out>\n",
                    Self::escape_xml(captured)
                ));
            }
            output.push_str("    </testcase>\n");
        }

        output.push_str("  </testsuite>\n");
        output.push_str("</testsuites>");
        Ok(output)
    }
}

/// Get a formatter based on the output format
pub fn get_formatter(format: OutputFormat, color: bool, quiet: bool) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => Box::new(TerminalFormatter::new(color, quiet)),
        OutputFormat::Json => Box::new(JsonFormatter::new(true)),
        OutputFormat::Junit => Box::new(JunitFormatter::new()),
    }
}
