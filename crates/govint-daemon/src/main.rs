//! # govint-daemon
//!
//! CLI binary wiring every governance-intelligence crate into a runnable
//! process: one-shot cycles, a cron-scheduled serve loop, a status
//! readout, and runtime config get/set.
//!
//! ## Usage
//!
//! ```bash
//! # Run a single cycle
//! govint-daemon run --operator-id ops-1
//!
//! # Re-enrich already-ingested mentions with no external calls
//! govint-daemon run --operator-id ops-1 --use-existing-data
//!
//! # Run cycles on a cron schedule until interrupted
//! govint-daemon serve --operator-id ops-1 --cron "0 0 * * * *"
//!
//! # Inspect pending/failed counts
//! govint-daemon status
//! ```

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use govint_daemon::{handle_config, run_once, serve, show_status, wiring::build_runtime, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let bootstrap = govint_daemon::wiring::load_bootstrap(cli.config.as_deref(), cli.log_level.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&bootstrap.log_level).unwrap_or_else(|_| EnvFilter::from_default_env()))
        .init();

    match cli.command {
        Commands::Run { operator_id, use_existing_data } => {
            let runtime = build_runtime(bootstrap).await?;
            run_once(&runtime, &operator_id, use_existing_data).await?;
        }
        Commands::Serve { operator_id, cron, timezone } => {
            let runtime = build_runtime(bootstrap).await?;
            serve(runtime, operator_id, cron, timezone).await?;
        }
        Commands::Status => {
            let runtime = build_runtime(bootstrap).await?;
            show_status(&runtime).await?;
        }
        Commands::Config { command } => {
            let runtime = build_runtime(bootstrap).await?;
            handle_config(&runtime, command).await?;
        }
    }

    Ok(())
}
