//! CLI argument definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Lintel - fault-tolerant parallel line linter
#[derive(Parser)]
#[command(name = "lintel")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files and directories
    Lint(LintArgs),

    /// List available rules
    Rules,
}

#[derive(Args)]
pub struct LintArgs {
    /// Files or directories to lint
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Show full traces for files that failed to lint
    #[arg(long)]
    pub debug: bool,

    /// Worker threads (0 = all CPUs)
    #[arg(short, long, default_value_t = 0)]
    pub jobs: usize,

    /// Use this configuration file for every file instead of discovering
    /// `.lintel.jsonc` / `.lintel.json` per directory
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Include hidden files and directories
    #[arg(long)]
    pub hidden: bool,

    /// Do not respect .gitignore files
    #[arg(long)]
    pub no_gitignore: bool,

    /// Skip files matching this glob (repeatable)
    #[arg(long, value_name = "GLOB")]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}
