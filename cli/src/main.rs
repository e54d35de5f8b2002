//! # CorpusRS Main Entry Point
//!
//! File: cli/src/main.rs
//!
//! ## Overview
//!
//! This file serves as the main entry point for the CorpusRS CLI application,
//! which builds a static-analysis corpus from a Debian mirror: the newest
//! upstream source tarball of every `main` package, stripped down to small
//! C/C++ sources and repacked as `.xz`.
//!
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the appropriate command handler
//!
//! ## Architecture
//!
//! - Each subcommand (`run`, `list`, `filter`) is a variant of the `Commands` enum
//! - `--verbose` and `--config` are global and accepted after any subcommand
//! - All errors are propagated to this level for consistent handling
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! corpusrs --help
//!
//! # Build the corpus with progress logging
//! corpusrs -v run
//!
//! # Show what would be fetched, using a local listing
//! corpusrs list --listing ls-lR.gz
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler
//! 4. Format and display any errors that occur
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

// Declare the top-level modules of the CLI crate.
mod commands; // Subcommand arguments and handlers
mod common; // Shared utilities (archives, fs, network)
mod core; // Core infrastructure (errors, config)
mod corpus; // Listing parsing, version selection, filtering, pipeline

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "corpusrs",
    about = "CorpusRS: C/C++ source corpus builder for Debian mirrors",
    long_about = "Downloads the newest upstream source tarball of every Debian main package,\n\
                  keeps only small C/C++ sources, and repacks each package as .xz.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to use instead of the user config file.
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Fetch, filter and repack every selected package.
    Run(commands::run::RunArgs),
    /// Print the archives a run would fetch.
    #[command(alias = "ls")]
    List(commands::list::ListArgs),
    /// Apply the source filter to a local directory.
    Filter(commands::filter::FilterArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Run(args) => commands::run::handle_run(args, config_path).await,
        Commands::List(args) => commands::list::handle_list(args, config_path).await,
        Commands::Filter(args) => commands::filter::handle_filter(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

// --- Basic Integration Tests ---
#[cfg(test)]
mod tests {
    use assert_cmd::Command;
    use predicates::prelude::*;
    fn corpusrs_cmd() -> Command {
        Command::cargo_bin("corpusrs").expect("Failed to find corpusrs binary for testing")
    }
    #[test]
    fn test_main_help_flag() {
        corpusrs_cmd().arg("--help").assert().success();
    }
    #[test]
    fn test_main_version_flag() {
        corpusrs_cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
    }
}
