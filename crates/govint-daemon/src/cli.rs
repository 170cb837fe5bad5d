//! CLI argument parsing for the governance-intelligence daemon.
//!
//! Flags override file config, which overrides compiled defaults (§13
//! CFG-01-style precedence for the bootstrap layer).

use clap::{Parser, Subcommand};

/// Governance-intelligence processing pipeline daemon.
///
/// Ingests citizen and media mentions, classifies and sentiment-tags
/// them, detects emerging issues, and keeps per-topic aggregates fresh.
#[derive(Parser, Debug)]
#[command(name = "govint-daemon")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to config file (overrides the default platform config dir)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the bootstrap log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run exactly one collection cycle and exit.
    Run {
        /// Operator id attributed to any mentions ingested this cycle
        #[arg(long)]
        operator_id: String,

        /// Skip the Raw Loader and Dedup sweep, only enriching
        /// already-stored mentions that have an embedding (§6)
        #[arg(long)]
        use_existing_data: bool,
    },

    /// Run cycles on a cron schedule until interrupted.
    Serve {
        /// Operator id attributed to any mentions ingested each cycle
        #[arg(long)]
        operator_id: String,

        /// 6-field cron expression (sec min hour dom month dow)
        #[arg(long, default_value = "0 0 * * * *")]
        cron: String,

        /// IANA timezone for the cron schedule (defaults to scheduler config)
        #[arg(long)]
        timezone: Option<String>,
    },

    /// Show pending/failed mention counts and the active topic catalogue.
    Status,

    /// Inspect or update the database-backed runtime configuration (§4.1).
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the current value of a dotted config key.
    Get {
        /// Dotted key, e.g. `processing.topic.min_score_threshold`
        key: String,
    },
    /// Persist a new value for a dotted config key, recording an audit row.
    Set {
        /// Dotted key, e.g. `processing.topic.min_score_threshold`
        key: String,
        /// New value, parsed as JSON (numbers/bools/strings/arrays all accepted)
        value: String,
        /// Who/what is making the change, recorded in the audit row
        #[arg(long, default_value = "cli")]
        updated_by: String,
        /// Why the value is changing, recorded in the audit row
        #[arg(long, default_value = "manual override")]
        reason: String,
    },
}
