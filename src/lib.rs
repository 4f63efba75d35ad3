//! pylembic-preflight library
//!
//! Injects a single "migration consistency" check into a check session, runs
//! it against a revision-graph validation engine and reports the aggregate
//! outcome in a session-level summary block.
//!
//! The session lifecycle is:
//! - Configuration resolution from raw session options
//! - Conditional synthesis of the migrations check at the front of the plan
//! - Execution of every planned check by the host orchestrator
//! - Aggregation of the migrations outcome from the session stats
//! - Rendering of the summary block after the normal per-check listing
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pylembic_preflight::config::{Configuration, SessionOptions};
//! use pylembic_preflight::engine::orchestrator::OrchestratorConfig;
//! use pylembic_preflight::engine::result::summarize_migrations;
//! use pylembic_preflight::validator::ScriptDirectoryValidator;
//! use pylembic_preflight::run_session;
//!
//! let config = Configuration::resolve(&SessionOptions::default(), "/srv/app".as_ref());
//! let report = run_session(
//!     &config,
//!     Vec::new(),
//!     Arc::new(ScriptDirectoryValidator::new()),
//!     OrchestratorConfig::default(),
//! );
//! let summary = summarize_migrations(&report.stats());
//! println!("Migrations check ran: {}", summary.ran);
//! ```

pub mod checks;
pub mod cli;
pub mod config;
pub mod engine;
pub mod validator;
pub mod version;

use config::Configuration;
use engine::orchestrator::{CheckOrchestrator, OrchestratorConfig, RegisteredCheck};
use engine::plan::Plan;
use engine::result::SessionReport;
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use validator::MigrationValidator;

// Re-exports for public API
pub use engine::orchestrator::CheckOrchestrator as Orchestrator;
pub use engine::result::{ResultSummary, SessionSummary};

/// Result of a single check execution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckResult {
    /// Check passed successfully
    Pass { message: String, duration_ms: u64 },
    /// Check failed
    Fail {
        message: String,
        details: String,
        duration_ms: u64,
    },
    /// Check was skipped
    Skip { reason: String },
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckResult::Pass { message, .. } => write!(f, "PASS: {}", message),
            CheckResult::Fail { message, details, .. } => {
                write!(f, "FAIL: {} ({})", message, details)
            }
            CheckResult::Skip { reason } => write!(f, "SKIP: {}", reason),
        }
    }
}

/// Correlation key attached to a check when it is planned.
///
/// The key travels from the registered check to its outcome record, so the
/// session summary can find the migrations outcome without matching names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckKind {
    /// A check supplied by the host session
    Host,
    /// The synthesized migration consistency check
    Migrations,
}

/// An executed check together with its outcome.
#[derive(Debug, Clone, Serialize)]
pub struct Check {
    /// Unique identifier within the session
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// Correlation key
    pub kind: CheckKind,
    /// Description of what this check validates
    pub description: String,
    /// Markers attached to the check
    pub markers: Vec<String>,
    /// Result of the check (None if not yet executed)
    pub result: Option<CheckResult>,
    /// Log text captured while the check ran
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured: Option<String>,
}

impl Default for Check {
    fn default() -> Self {
        Check {
            id: String::new(),
            name: String::new(),
            kind: CheckKind::Host,
            description: String::new(),
            markers: Vec::new(),
            result: None,
            captured: None,
        }
    }
}

/// Per-check log capture.
///
/// The orchestrator hands a fresh context to every check; whatever the check
/// logs is attached to its outcome record.
#[derive(Debug, Default)]
pub struct CheckContext {
    lines: Vec<String>,
}

impl CheckContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one line of captured output.
    pub fn log(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Consume the context, returning the captured text if anything was logged.
    pub fn into_captured(self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.join("\n"))
        }
    }
}

/// Error types for pylembic-preflight operations.
#[derive(Debug, Error)]
pub enum PreflightError {
    /// The migrations directory has no `versions` subdirectory
    #[error("No versions directory found in {path}")]
    VersionsNotFound { path: PathBuf },

    /// I/O error
    #[error("I/O error in {context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A revision file could not be interpreted
    #[error("Parse error in {path}: {message}")]
    RevisionParse { path: PathBuf, message: String },

    /// Report serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Validation engine failure not covered above
    #[error("Validation engine error: {0}")]
    Engine(String),
}

/// Build the session plan: the migrations check (when synthesized) followed
/// by `host_checks` in their original order.
pub fn plan_session(
    config: &Configuration,
    host_checks: Vec<RegisteredCheck>,
    validator: Arc<dyn MigrationValidator>,
) -> Plan {
    checks::migrations::synthesize(Plan::new(host_checks), config, validator)
}

/// Orchestrator with the session's markers registered.
pub fn session_orchestrator(config: OrchestratorConfig) -> CheckOrchestrator {
    let mut orchestrator = CheckOrchestrator::new(config);
    orchestrator.register_marker(
        checks::migrations::MARKER,
        checks::migrations::MARKER_DESCRIPTION,
    );
    orchestrator
}

/// Run one complete check session.
///
/// Synthesizes the migrations check from `config` (unless skipped or the
/// migrations directory is absent), puts it in front of `host_checks` and
/// executes the resulting plan. The caller aggregates and renders the report.
pub fn run_session(
    config: &Configuration,
    host_checks: Vec<RegisteredCheck>,
    validator: Arc<dyn MigrationValidator>,
    orchestrator_config: OrchestratorConfig,
) -> SessionReport {
    let plan = plan_session(config, host_checks, validator);
    session_orchestrator(orchestrator_config).run_plan(plan)
}
