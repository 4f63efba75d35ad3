//! pylembic-preflight CLI entry point
//!
//! Runs a check session with the alembic migration consistency check.

use clap::Parser;
use pylembic_preflight::cli::args::{Args, Command};
use pylembic_preflight::cli::output::get_formatter;
use pylembic_preflight::config::{session_base_dir, Configuration};
use pylembic_preflight::engine::orchestrator::OrchestratorConfig;
use pylembic_preflight::engine::plan::Synthesis;
use pylembic_preflight::validator::ScriptDirectoryValidator;
use pylembic_preflight::version::get_build_info;
use pylembic_preflight::{plan_session, run_session, session_orchestrator, PreflightError};

use std::process::ExitCode;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help and --version are reported as "errors" by clap
            return if e.use_stderr() {
                ExitCode::from(3)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    init_tracing(&args);

    match args.command() {
        Command::Version => {
            println!("{}", get_build_info());
            ExitCode::SUCCESS
        }
        Command::List => list_session(&args),
        Command::Check => run_checks(&args),
    }
}

fn init_tracing(args: &Args) {
    let default_level = if args.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn resolve_config(args: &Args) -> Result<Configuration, PreflightError> {
    let base_dir = session_base_dir(args.rootdir.as_deref())?;
    let config = Configuration::resolve(&args.session, &base_dir);
    debug!(?config, "session configuration resolved");
    Ok(config)
}

fn list_session(args: &Args) -> ExitCode {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(3);
        }
    };

    let orchestrator = session_orchestrator(OrchestratorConfig::default());
    let plan = plan_session(&config, Vec::new(), Arc::new(ScriptDirectoryValidator::new()));

    println!("Markers:");
    for (name, description) in orchestrator.markers() {
        println!("  @{:<12} {}", name, description);
    }
    println!();

    println!("Planned checks:");
    for check in plan.checks() {
        println!("  {:<24} {}", check.id, check.description);
    }
    match plan.synthesis() {
        Synthesis::Skipped => println!("  (migrations check skipped on request)"),
        Synthesis::DirectoryAbsent { path } => {
            println!("  (no migrations directory at {})", path.display())
        }
        Synthesis::Inserted | Synthesis::Pending => {}
    }

    ExitCode::SUCCESS
}

fn run_checks(args: &Args) -> ExitCode {
    let config = match resolve_config(args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(3);
        }
    };

    let report = run_session(
        &config,
        Vec::new(),
        Arc::new(ScriptDirectoryValidator::new()),
        OrchestratorConfig {
            fail_fast: args.fail_fast,
        },
    );

    let formatter = get_formatter(args.format, args.color_enabled(), args.quiet);
    match formatter.format(&report, &config) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("Error formatting report: {}", e);
            return ExitCode::from(3);
        }
    }

    if report.has_failures() {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
