//! cli
//!
//! Command-line interface layer for Landfall.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments and global flags
//! - Load configuration and construct the REST collaborators
//! - Delegate to the [`crate::run`] orchestrators
//!
//! The CLI layer is thin. It never talks to the catalog, storage, or
//! pipeline directly; all branch mutations flow through the
//! orchestrators and their branch transactions.

pub mod args;

pub use args::{Cli, Shell};

use anyhow::{Context, Result};
use clap::CommandFactory;
use clap_complete::{generate, shells};

use crate::catalog::rest::RestCatalog;
use crate::core::config::Config;
use crate::generate::TripBatchGenerator;
use crate::pipeline::rest::RestPipelineService;
use crate::run::trigger::{CycleEvent, Trigger};
use crate::run::LogReportSink;
use crate::source::CodeSource;
use crate::storage::http::HttpObjectStore;

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub async fn run() -> Result<()> {
    let cli = Cli::parse_args();
    init_logging(cli.debug, cli.quiet);

    match cli.command {
        args::Command::Run { date, event_id } => {
            let config = Config::load(cli.config.as_deref())
                .context("failed to load configuration")?;
            let mut event = CycleEvent::now();
            if let Some(date) = date {
                event.trip_date = date;
            }
            if let Some(id) = event_id {
                event.event_id = id;
            }
            run_cycle(&config, &event).await
        }
        args::Command::Completion { shell } => completion(shell),
    }
}

/// Wire the REST collaborators and run one cycle.
async fn run_cycle(config: &Config, event: &CycleEvent) -> Result<()> {
    let catalog = RestCatalog::new(&config.catalog_url, &config.api_key);
    let store = HttpObjectStore::new(&config.storage_endpoint, &config.api_key);
    let pipeline = RestPipelineService::new(&config.pipeline_url, &config.api_key);
    let generator = TripBatchGenerator::new(
        config.numerical_columns.clone(),
        config.gib_per_iteration,
    );
    let source = CodeSource::new(&config.code_repo_url, &config.pipeline_subdir);
    let sink = LogReportSink;

    let trigger = Trigger::new(
        &catalog, &store, &pipeline, &generator, &source, &sink, config,
    );
    trigger
        .handle(event)
        .await
        .context("ingestion failed; cycle aborted")?;
    Ok(())
}

/// Generate shell completion scripts on stdout.
fn completion(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();

    match shell {
        Shell::Bash => generate(shells::Bash, &mut cmd, &name, &mut std::io::stdout()),
        Shell::Zsh => generate(shells::Zsh, &mut cmd, &name, &mut std::io::stdout()),
        Shell::Fish => generate(shells::Fish, &mut cmd, &name, &mut std::io::stdout()),
        Shell::PowerShell => generate(shells::PowerShell, &mut cmd, &name, &mut std::io::stdout()),
    }

    Ok(())
}

/// Level filter from flags; an explicit `RUST_LOG` overrides both.
fn init_logging(debug: bool, quiet: bool) {
    let default_filter = if debug {
        "landfall=debug"
    } else if quiet {
        "error"
    } else {
        "landfall=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
