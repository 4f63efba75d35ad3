//! Migration graph validation engine.
//!
//! The session talks to the engine only through [`MigrationValidator`].
//! [`ScriptDirectoryValidator`] is the default engine: it reads the alembic
//! `versions` directory and checks the resulting revision graph for
//! duplicate ids, dangling parents, cycles, orphans and (optionally)
//! multiple heads.

pub mod graph;
pub mod script;

use crate::{CheckContext, PreflightError};
use std::path::Path;
use tracing::{debug, warn};

/// A validation engine for an alembic migrations directory.
pub trait MigrationValidator: Send + Sync {
    /// Validate the revision graph under `path`.
    ///
    /// Returns `Ok(false)` for an inconsistent graph. When `verbose` is set,
    /// descriptive trace text goes to `ctx`.
    fn validate(
        &self,
        path: &Path,
        verbose: bool,
        detect_branches: bool,
        ctx: &mut CheckContext,
    ) -> Result<bool, PreflightError>;
}

/// Default engine working directly on revision scripts.
#[derive(Debug, Clone, Default)]
pub struct ScriptDirectoryValidator;

impl ScriptDirectoryValidator {
    pub fn new() -> Self {
        ScriptDirectoryValidator
    }
}

impl MigrationValidator for ScriptDirectoryValidator {
    fn validate(
        &self,
        path: &Path,
        verbose: bool,
        detect_branches: bool,
        ctx: &mut CheckContext,
    ) -> Result<bool, PreflightError> {
        let revisions = script::load_revisions(path)?;
        let analysis = graph::analyze(&revisions, detect_branches);

        debug!(
            path = %path.display(),
            revisions = analysis.revision_count,
            heads = analysis.heads.len(),
            "revision graph analysed"
        );
        for issue in &analysis.issues {
            warn!(path = %path.display(), "{}", issue);
        }

        if verbose {
            ctx.log(format!("Validating migrations in {}", path.display()));
            ctx.log(format!("Found {} revision(s)", analysis.revision_count));
            if !analysis.heads.is_empty() {
                ctx.log(format!("Heads: {}", analysis.heads.join(", ")));
            }
            if !analysis.bases.is_empty() {
                ctx.log(format!("Bases: {}", analysis.bases.join(", ")));
            }
            for issue in &analysis.issues {
                ctx.log(issue.to_string());
            }
            if analysis.is_consistent() {
                ctx.log("Migrations validation passed");
            } else {
                ctx.log(format!(
                    "Migrations validation failed with {} issue(s)",
                    analysis.issues.len()
                ));
            }
        }

        Ok(analysis.is_consistent())
    }
}
