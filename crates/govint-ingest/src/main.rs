//! # govint-ingest
//!
//! Standalone Raw Loader binary: reads every `.csv` file sitting in the
//! raw-data directory into `pending` mention rows, then moves each
//! consumed file aside. Can be run on its own (e.g. from cron) or is
//! invoked as phase 1 of `govint-scheduler`'s cycle.

use anyhow::Context;
use clap::Parser;
use govint_config::{BootstrapSettings, PathResolver};
use govint_ingest::load_raw_directory;
use govint_storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "govint-ingest")]
#[command(author, version, about = "Load raw collector CSVs into storage", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Operator id to stamp on loaded mentions (falls back to bootstrap config)
    #[arg(short, long)]
    operator_id: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let settings = BootstrapSettings::load(cli.config.as_deref()).context("failed to load bootstrap settings")?;
    let resolver = PathResolver::from_bootstrap(&settings);

    let operator_id = cli
        .operator_id
        .or(settings.default_operator_id.clone())
        .context("no operator id given on the CLI or in bootstrap settings")?;

    let storage = Storage::open(resolver.db_path()).context("failed to open storage")?;
    std::fs::create_dir_all(resolver.raw_input_path()).context("failed to create raw input directory")?;

    let summary = load_raw_directory(&storage, resolver.raw_input_path(), &resolver.raw_processed_path(), &operator_id)?;

    info!(
        files_processed = summary.files_processed,
        mentions_loaded = summary.mentions_loaded,
        rows_skipped = summary.rows_skipped,
        "raw loader run complete"
    );

    Ok(())
}
