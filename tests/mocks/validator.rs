//! Mock validation engine.
//!
//! Simulates the engine outcomes the session has to handle:
//! - Consistent and inconsistent revision graphs
//! - Engine errors
//! - Verbose trace output

use pylembic_preflight::validator::MigrationValidator;
use pylembic_preflight::{CheckContext, PreflightError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// What the mock engine answers with
#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Valid,
    Invalid,
    Error(String),
}

/// Arguments of one recorded `validate` call
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub path: PathBuf,
    pub verbose: bool,
    pub detect_branches: bool,
}

pub struct MockValidator {
    outcome: MockOutcome,
    trace: Vec<String>,
    calls: AtomicUsize,
    recorded: Mutex<Vec<MockCall>>,
}

impl MockValidator {
    pub fn new(outcome: MockOutcome) -> Self {
        MockValidator {
            outcome,
            trace: Vec::new(),
            calls: AtomicUsize::new(0),
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn valid() -> Arc<Self> {
        Arc::new(Self::new(MockOutcome::Valid))
    }

    pub fn invalid() -> Arc<Self> {
        Arc::new(Self::new(MockOutcome::Invalid))
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self::new(MockOutcome::Error(message.to_string())))
    }

    /// Lines logged to the check context when verbose is set
    pub fn with_trace(mut self, lines: &[&str]) -> Self {
        self.trace = lines.iter().map(|l| l.to_string()).collect();
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.recorded.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl MigrationValidator for MockValidator {
    fn validate(
        &self,
        path: &Path,
        verbose: bool,
        detect_branches: bool,
        ctx: &mut CheckContext,
    ) -> Result<bool, PreflightError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut recorded) = self.recorded.lock() {
            recorded.push(MockCall {
                path: path.to_path_buf(),
                verbose,
                detect_branches,
            });
        }

        if verbose {
            for line in &self.trace {
                ctx.log(line.clone());
            }
        }

        match &self.outcome {
            MockOutcome::Valid => Ok(true),
            MockOutcome::Invalid => Ok(false),
            MockOutcome::Error(message) => Err(PreflightError::Engine(message.clone())),
        }
    }
}
