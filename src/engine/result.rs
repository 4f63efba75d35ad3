//! Result aggregation and reporting.
//!
//! Collects check outcomes, partitions them into session stats and reduces
//! the migrations outcome to a [`SessionSummary`].

use crate::engine::plan::Synthesis;
use crate::{Check, CheckKind, CheckResult};
use serde::Serialize;

/// Result summary statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResultSummary {
    pub passed: u32,
    pub failed: u32,
    pub skipped: u32,
    pub total: u32,
    pub total_duration_ms: u64,
}

/// Outcome records of one session, partitioned by status.
///
/// Each partition keeps execution order.
#[derive(Debug, Default)]
pub struct SessionStats<'a> {
    pub passed: Vec<&'a Check>,
    pub failed: Vec<&'a Check>,
    pub skipped: Vec<&'a Check>,
}

/// Session report containing all check outcomes
#[derive(Debug, Clone, Serialize)]
pub struct SessionReport {
    pub checks: Vec<Check>,
    pub total_duration_ms: u64,
    pub synthesis: Synthesis,
}

impl SessionReport {
    /// Create a new empty report
    pub fn new() -> Self {
        SessionReport {
            checks: Vec::new(),
            total_duration_ms: 0,
            synthesis: Synthesis::Pending,
        }
    }

    /// Calculate summary statistics
    pub fn summary(&self) -> ResultSummary {
        let mut summary = ResultSummary::default();

        for check in &self.checks {
            summary.total += 1;

            match &check.result {
                Some(CheckResult::Pass { duration_ms, .. }) => {
                    summary.passed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Fail { duration_ms, .. }) => {
                    summary.failed += 1;
                    summary.total_duration_ms += duration_ms;
                }
                Some(CheckResult::Skip { .. }) | None => {
                    summary.skipped += 1;
                }
            }
        }

        summary
    }

    /// Partition outcomes by status
    pub fn stats(&self) -> SessionStats<'_> {
        let mut stats = SessionStats::default();

        for check in &self.checks {
            match &check.result {
                Some(CheckResult::Pass { .. }) => stats.passed.push(check),
                Some(CheckResult::Fail { .. }) => stats.failed.push(check),
                Some(CheckResult::Skip { .. }) | None => stats.skipped.push(check),
            }
        }

        stats
    }

    /// Whether the session should end with a failing exit status
    pub fn has_failures(&self) -> bool {
        self.checks
            .iter()
            .any(|c| matches!(&c.result, Some(CheckResult::Fail { .. })))
    }
}

impl Default for SessionReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Result aggregator for collecting check outcomes
pub struct ResultAggregator {
    checks: Vec<Check>,
}

impl ResultAggregator {
    /// Create a new result aggregator
    pub fn new() -> Self {
        ResultAggregator { checks: Vec::new() }
    }

    /// Add a completed check result
    pub fn add_result(&mut self, check: Check) {
        self.checks.push(check);
    }

    /// Create final session report
    pub fn to_report(self, total_duration_ms: u64, synthesis: Synthesis) -> SessionReport {
        SessionReport {
            checks: self.checks,
            total_duration_ms,
            synthesis,
        }
    }
}

impl Default for ResultAggregator {
    fn default() -> Self {
        Self::new()
    }
}

/// Aggregated outcome of the migrations check for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionSummary {
    /// The migrations check was executed
    pub ran: bool,
    /// The migrations check passed (meaningless when `ran` is false)
    pub passed: bool,
    /// Captured diagnostic text, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<String>,
}

/// Reduce the session stats to the migrations outcome.
///
/// The passed partition is scanned before the failed one; the first record
/// carrying [`CheckKind::Migrations`] wins. With no such record the check never
/// ran, which covers both the skipped and the absent-directory sessions.
pub fn summarize_migrations(stats: &SessionStats<'_>) -> SessionSummary {
    let is_migrations = |c: &&&Check| c.kind == CheckKind::Migrations;

    if let Some(check) = stats.passed.iter().find(is_migrations) {
        return SessionSummary {
            ran: true,
            passed: true,
            diagnostics: check.captured.clone(),
        };
    }

    if let Some(check) = stats.failed.iter().find(is_migrations) {
        let diagnostics = check.captured.clone().or_else(|| match &check.result {
            Some(CheckResult::Fail { details, .. }) if !details.is_empty() => Some(details.clone()),
            _ => None,
        });
        return SessionSummary {
            ran: true,
            passed: false,
            diagnostics,
        };
    }

    SessionSummary::default()
}
