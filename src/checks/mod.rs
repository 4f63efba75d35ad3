//! Checks synthesized by the session.
//!
//! The only synthesized check is the migration consistency check. It follows
//! the same degradation rules as any host check:
//! - Skip requested: No check is planned (not a Skip result)
//! - Migrations directory absent: No check is planned, silently
//! - Engine returns false: Fail result, diagnostics preserved
//! - Engine error: Propagated to the orchestrator, which records a Fail result
//!
//! Checks never panic. All error conditions end up as CheckResult variants
//! for the caller to handle.

pub mod migrations;
