//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this configuration file
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Errors only

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Landfall - Write-Audit-Publish orchestration for versioned tables
#[derive(Parser, Debug)]
#[command(name = "landfall")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Errors only
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run one ingest-transform-report cycle
    #[command(
        name = "run",
        long_about = "Run one full Write-Audit-Publish cycle.\n\n\
            Lands a fresh input-port batch on the trunk through an isolated \
            ingestion branch, then executes the transformation pipeline on a \
            sandbox branch and publishes it if its audits pass. A failed \
            transformation leaves its sandbox branch in the catalog for \
            inspection and does not fail the cycle.",
        after_help = "\
EXAMPLES:
    # Run a cycle for today
    landfall run

    # Re-run a specific trip date
    landfall run --date 15/08/2026"
    )]
    Run {
        /// Trip date stamped into the batch (DD/MM/YYYY); defaults to today
        #[arg(long, value_name = "DD/MM/YYYY")]
        date: Option<String>,

        /// Correlation id for the cycle; defaults to a fresh UUID
        #[arg(long, value_name = "ID")]
        event_id: Option<String>,
    },

    /// Generate shell completion scripts
    #[command(
        name = "completion",
        after_help = "\
EXAMPLES:
    # Bash (add to ~/.bashrc)
    landfall completion bash >> ~/.bashrc

    # Zsh (add to ~/.zshrc)
    landfall completion zsh >> ~/.zshrc

    # Fish
    landfall completion fish > ~/.config/fish/completions/landfall.fish"
    )]
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}
