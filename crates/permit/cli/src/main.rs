//! Permit CLI
//!
//! Terminal front-end for the permit engine:
//! - Validate guard configuration files
//! - Evaluate a fixture principal against required permissions
//! - Enforce a configured guard for a named operation

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use permit_engine::PermitConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod fixture;

use commands::{check, guard, validate};

/// Permit CLI application
#[derive(Parser)]
#[command(name = "permit")]
#[command(about = "Permit - permission evaluation and guard validation", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PERMIT_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long, env = "PERMIT_LOG_JSON")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Evaluate required permissions for a fixture principal
    Check(check::CheckArgs),

    /// Enforce the configured guard of an operation
    Guard(guard::GuardArgs),

    /// Validate configuration and list guarded operations
    Validate,
}

/// Exit code for usage and configuration errors, distinct from a denial
const ERROR_EXIT: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    let env_filter =
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into());

    if cli.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .without_time(),
            )
            .init();
    }

    match run(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::from(ERROR_EXIT)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    // Load config
    let config = PermitConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Check(args) => check::run(args, &config),
        Commands::Guard(args) => guard::run(args, &config),
        Commands::Validate => validate::run(&config),
    }
}
