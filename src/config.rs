//! Session option resolution.
//!
//! Turns the raw `pylembic` option group into the immutable [`Configuration`]
//! used by the rest of the session.

use crate::PreflightError;
use clap::Args;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Default name of the alembic migrations directory.
pub const DEFAULT_MIGRATIONS_DIR: &str = "migrations";

/// Raw session options, registered as the `pylembic` option group.
#[derive(Debug, Clone, Args)]
#[command(next_help_heading = "pylembic")]
pub struct SessionOptions {
    /// Path to the alembic's migrations directory
    #[arg(
        long = "alembic-migrations-dir",
        value_name = "PATH",
        global = true,
        env = "ALEMBIC_MIGRATIONS_DIR",
        default_value = DEFAULT_MIGRATIONS_DIR
    )]
    pub migrations_dir: PathBuf,

    /// Skip pylembic validation
    #[arg(long = "skip-pylembic", global = true)]
    pub skip: bool,

    /// Detect migration branches (default: on)
    ///
    /// Only cancels an earlier `--no-pylembic-detect-branches`; resolution
    /// reads `no_detect_branches` alone.
    #[arg(
        long = "pylembic-detect-branches",
        global = true,
        overrides_with = "no_detect_branches"
    )]
    pub detect_branches: bool,

    /// Do not report multiple heads as a failure
    #[arg(
        long = "no-pylembic-detect-branches",
        global = true,
        overrides_with = "detect_branches"
    )]
    pub no_detect_branches: bool,

    /// Show verbose output for pylembic validation
    #[arg(id = "pylembic_verbose", long = "pylembic-verbose", global = true)]
    pub verbose: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        SessionOptions {
            migrations_dir: PathBuf::from(DEFAULT_MIGRATIONS_DIR),
            skip: false,
            detect_branches: false,
            no_detect_branches: false,
            verbose: false,
        }
    }
}

/// Resolved session configuration. Never mutated after resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Configuration {
    /// Migrations directory joined onto the session base directory
    pub migrations_path: PathBuf,
    pub skip: bool,
    pub detect_branches: bool,
    pub verbose: bool,
}

impl Configuration {
    /// Resolve options against `base_dir` (normally the working directory).
    ///
    /// An absolute `--alembic-migrations-dir` replaces the base entirely.
    pub fn resolve(options: &SessionOptions, base_dir: &Path) -> Self {
        Configuration {
            migrations_path: base_dir.join(&options.migrations_dir),
            skip: options.skip,
            detect_branches: !options.no_detect_branches,
            verbose: options.verbose,
        }
    }
}

/// Absolute directory the migrations path is resolved against.
///
/// A relative `rootdir` is taken relative to the working directory; without
/// one the working directory itself is used.
pub fn session_base_dir(rootdir: Option<&Path>) -> Result<PathBuf, PreflightError> {
    match rootdir {
        Some(dir) if dir.is_absolute() => Ok(dir.to_path_buf()),
        rootdir => {
            let cwd = std::env::current_dir().map_err(|e| PreflightError::Io {
                context: "resolving the working directory".to_string(),
                source: e,
            })?;
            Ok(match rootdir {
                Some(dir) => cwd.join(dir),
                None => cwd,
            })
        }
    }
}
