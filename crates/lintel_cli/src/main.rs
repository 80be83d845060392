//! Lintel CLI
//!
//! Fault-tolerant parallel line linter.

mod cli;
mod commands;
mod output;

use std::process::ExitCode;

use clap::Parser;
use miette::Result;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(has_findings) => {
            if has_findings {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            error!("{:?}", e);
            ExitCode::from(2)
        }
    }
}

/// Returns whether any violation or error result was reported.
fn run(cli: Cli) -> Result<bool> {
    match &cli.command {
        Commands::Lint(args) => commands::lint::run_lint(args),
        Commands::Rules => {
            commands::rules::run_list_rules()?;
            Ok(false)
        }
    }
}
