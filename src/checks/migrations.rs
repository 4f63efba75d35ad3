//! Migration consistency check.
//!
//! Decides whether the session gets a migrations check and, when it does,
//! builds it around the resolved configuration.

use crate::config::Configuration;
use crate::engine::orchestrator::RegisteredCheck;
use crate::engine::plan::{Plan, Synthesis};
use crate::validator::MigrationValidator;
use crate::{CheckContext, CheckKind, CheckResult, PreflightError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Id and display name of the synthesized check
pub const CHECK_ID: &str = "pylembic_migrations";

/// Marker attached to the synthesized check
pub const MARKER: &str = "pylembic";

pub const MARKER_DESCRIPTION: &str = "mark test as a pylembic migration test";

/// Add the migrations check to the front of `plan` when the session calls for it.
///
/// First match wins: a skip request leaves the plan untouched, so does a
/// missing migrations directory. Neither is an error.
pub fn synthesize(plan: Plan, config: &Configuration, validator: Arc<dyn MigrationValidator>) -> Plan {
    if config.skip {
        info!("pylembic validation skipped on request");
        return plan.with_synthesis(Synthesis::Skipped);
    }

    if !config.migrations_path.exists() {
        debug!(
            path = %config.migrations_path.display(),
            "migrations directory not found, no check planned"
        );
        return plan.with_synthesis(Synthesis::DirectoryAbsent {
            path: config.migrations_path.clone(),
        });
    }

    let bound = config.clone();
    let check = RegisteredCheck::new(CHECK_ID, CHECK_ID, CheckKind::Migrations, move |ctx| {
        run_migrations_check(&bound, validator.as_ref(), ctx)
    })
    .with_description("Validate the alembic revision graph")
    .with_marker(MARKER);

    debug!(path = %config.migrations_path.display(), "migrations check planned");
    plan.prepend(check).with_synthesis(Synthesis::Inserted)
}

/// Body of the migrations check.
///
/// Engine errors are returned as-is; the orchestrator turns them into a
/// failed outcome like any other check error.
pub fn run_migrations_check(
    config: &Configuration,
    validator: &dyn MigrationValidator,
    ctx: &mut CheckContext,
) -> Result<CheckResult, PreflightError> {
    let start = Instant::now();

    let valid = validator.validate(
        &config.migrations_path,
        config.verbose,
        config.detect_branches,
        ctx,
    )?;

    let duration_ms = start.elapsed().as_millis() as u64;

    if valid {
        Ok(CheckResult::Pass {
            message: "Migrations validation successful".to_string(),
            duration_ms,
        })
    } else {
        Ok(CheckResult::Fail {
            message: "Migrations validation failed".to_string(),
            details: format!(
                "Revision graph in {} is inconsistent",
                config.migrations_path.display()
            ),
            duration_ms,
        })
    }
}
