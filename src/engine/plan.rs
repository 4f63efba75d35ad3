//! Ordered check plan for one session.
//!
//! The host supplies its checks up front; the migrations synthesizer may then
//! put exactly one more check in front of them. The orchestrator consumes the
//! finished plan without knowing how its entries were produced.

use crate::engine::orchestrator::RegisteredCheck;
use serde::Serialize;
use std::path::PathBuf;

/// What the synthesizer decided for this session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Synthesis {
    /// No synthesis attempted yet
    Pending,
    /// `--skip-pylembic` was given
    Skipped,
    /// The resolved migrations directory does not exist
    DirectoryAbsent { path: PathBuf },
    /// The migrations check was put at the front of the plan
    Inserted,
}

/// Ordered list of checks to execute.
pub struct Plan {
    checks: Vec<RegisteredCheck>,
    synthesis: Synthesis,
}

impl Plan {
    /// Start a plan from the host's collected checks.
    pub fn new(checks: Vec<RegisteredCheck>) -> Self {
        Plan {
            checks,
            synthesis: Synthesis::Pending,
        }
    }

    /// Put a check in front of every check already planned.
    pub fn prepend(mut self, check: RegisteredCheck) -> Self {
        self.checks.insert(0, check);
        self
    }

    /// Record the synthesizer's decision.
    pub fn with_synthesis(mut self, synthesis: Synthesis) -> Self {
        self.synthesis = synthesis;
        self
    }

    pub fn synthesis(&self) -> &Synthesis {
        &self.synthesis
    }

    /// Planned check ids in execution order
    pub fn ids(&self) -> Vec<&str> {
        self.checks.iter().map(|c| c.id.as_str()).collect()
    }

    pub fn checks(&self) -> &[RegisteredCheck] {
        &self.checks
    }

    pub fn len(&self) -> usize {
        self.checks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    pub fn into_parts(self) -> (Vec<RegisteredCheck>, Synthesis) {
        (self.checks, self.synthesis)
    }
}
