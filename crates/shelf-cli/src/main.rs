//! # shelf CLI entry point
//!
//! Parses command-line arguments, initializes tracing, resolves
//! configuration, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelf_cli::check::{run_check, CheckArgs};
use shelf_cli::config::ShelfConfig;
use shelf_cli::replay::{run_replay, ReplayArgs};

/// Shelf lending ledger CLI.
///
/// Replays scripted borrow/return/catalog operations against an in-memory
/// library and reports every outcome.
#[derive(Parser, Debug)]
#[command(name = "shelf", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay an operation script and print a JSON report.
    Replay(ReplayArgs),

    /// Parse a script and summarize its steps.
    Check(CheckArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if cli.json_logs {
        subscriber.json().init();
    } else {
        subscriber.init();
    }

    tracing::debug!(version = env!("CARGO_PKG_VERSION"), "shelf CLI starting");

    let result = match cli.command {
        Commands::Replay(args) => {
            ShelfConfig::load(cli.config.as_deref()).and_then(|config| run_replay(&args, &config))
        }
        Commands::Check(args) => run_check(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}
