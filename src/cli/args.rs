//! Command line arguments for pylembic-preflight.

use crate::config::SessionOptions;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Run the check session (default)
    #[default]
    Check,
    /// List registered markers and the planned checks
    List,
    /// Print version and build information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
    /// JUnit XML for CI/CD integration
    Junit,
}

/// Parsed command line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pylembic-preflight",
    version,
    about = "Validate the alembic revision graph as part of a check session",
    long_about = None
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub session: SessionOptions,

    /// Directory the migrations path is resolved against (default: current directory)
    #[arg(long, value_name = "DIR", global = true)]
    pub rootdir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, env = "PYLEMBIC_PREFLIGHT_FORMAT", global = true)]
    pub format: OutputFormat,

    /// Only list failing checks
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug-level logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Stop on first failure
    #[arg(long, global = true)]
    pub fail_fast: bool,
}

impl Args {
    /// The command to run, `check` when none was given
    pub fn command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    /// Color is on unless disabled by flag or the NO_COLOR convention
    pub fn color_enabled(&self) -> bool {
        !self.no_color && std::env::var_os("NO_COLOR").is_none()
    }
}
