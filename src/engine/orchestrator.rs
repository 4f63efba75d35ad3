//! Check execution orchestrator.
//!
//! Runs a [`Plan`] in order and records one outcome per executed check.
//!
//! # Graceful Degradation
//!
//! This module handles errors gracefully:
//! - Check panics: Caught via std::panic::catch_unwind, converted to Fail result
//! - Check errors: An `Err` returned by a check becomes a Fail result carrying the error text
//! - Unknown markers: Logged as a warning, the check still runs
//! - Empty plan: Returns empty report (not an error)
//!
//! Every planned check runs regardless of individual failures unless
//! fail_fast is enabled. No function in this module will panic.

use crate::engine::plan::Plan;
use crate::engine::result::{ResultAggregator, SessionReport};
use crate::{Check, CheckContext, CheckKind, CheckResult, PreflightError};
use std::any::Any;
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{debug, warn};

/// Orchestrator configuration
#[derive(Debug, Clone, Default)]
pub struct OrchestratorConfig {
    /// Stop after the first failed check
    pub fail_fast: bool,
}

/// Body of a registered check.
pub type CheckFn = Box<dyn Fn(&mut CheckContext) -> Result<CheckResult, PreflightError> + Send + Sync>;

/// A registered check with its execution function
pub struct RegisteredCheck {
    pub id: String,
    pub name: String,
    pub kind: CheckKind,
    pub description: String,
    pub markers: Vec<String>,
    pub check_fn: CheckFn,
}

impl RegisteredCheck {
    pub fn new<F>(id: &str, name: &str, kind: CheckKind, check_fn: F) -> Self
    where
        F: Fn(&mut CheckContext) -> Result<CheckResult, PreflightError> + Send + Sync + 'static,
    {
        RegisteredCheck {
            id: id.to_string(),
            name: name.to_string(),
            kind,
            description: String::new(),
            markers: Vec::new(),
            check_fn: Box::new(check_fn),
        }
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    pub fn with_marker(mut self, marker: &str) -> Self {
        self.markers.push(marker.to_string());
        self
    }
}

/// Check orchestrator
pub struct CheckOrchestrator {
    config: OrchestratorConfig,
    markers: BTreeMap<String, String>,
}

impl CheckOrchestrator {
    /// Create a new orchestrator with the given configuration
    pub fn new(config: OrchestratorConfig) -> Self {
        CheckOrchestrator {
            config,
            markers: BTreeMap::new(),
        }
    }

    /// Register a marker name with its description
    pub fn register_marker(&mut self, name: &str, description: &str) {
        self.markers.insert(name.to_string(), description.to_string());
    }

    /// Registered markers, sorted by name
    pub fn markers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.markers.iter().map(|(n, d)| (n.as_str(), d.as_str()))
    }

    /// Execute every check of the plan in plan order
    pub fn run_plan(&self, plan: Plan) -> SessionReport {
        let start = Instant::now();
        let (checks, synthesis) = plan.into_parts();
        let mut aggregator = ResultAggregator::new();

        debug!(count = checks.len(), "running planned checks");

        for check in &checks {
            for marker in &check.markers {
                if !self.markers.contains_key(marker) {
                    warn!(check = %check.id, marker = %marker, "unknown marker");
                }
            }

            let mut ctx = CheckContext::new();
            let result = self.execute_check(check, &mut ctx);
            debug!(check = %check.id, outcome = %result, "check finished");

            let failed = matches!(result, CheckResult::Fail { .. });

            aggregator.add_result(Check {
                id: check.id.clone(),
                name: check.name.clone(),
                kind: check.kind,
                description: check.description.clone(),
                markers: check.markers.clone(),
                result: Some(result),
                captured: ctx.into_captured(),
            });

            if self.config.fail_fast && failed {
                debug!(check = %check.id, "fail-fast: stopping session");
                break;
            }
        }

        let total_duration_ms = start.elapsed().as_millis() as u64;
        aggregator.to_report(total_duration_ms, synthesis)
    }

    /// Execute a single check, converting errors and panics into failures
    fn execute_check(&self, check: &RegisteredCheck, ctx: &mut CheckContext) -> CheckResult {
        let start = Instant::now();

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| (check.check_fn)(ctx)));

        match result {
            Ok(Ok(check_result)) => check_result,
            Ok(Err(e)) => CheckResult::Fail {
                message: "Check raised an error".to_string(),
                details: e.to_string(),
                duration_ms: start.elapsed().as_millis() as u64,
            },
            Err(payload) => CheckResult::Fail {
                message: "Check panicked during execution".to_string(),
                details: panic_message(payload.as_ref()),
                duration_ms: start.elapsed().as_millis() as u64,
            },
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "An unexpected error occurred".to_string()
    }
}
