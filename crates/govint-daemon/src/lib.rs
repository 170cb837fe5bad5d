//! Binary entrypoint library exports.
//!
//! # Modules
//!
//! - `cli`: command-line argument parsing with clap
//! - `commands`: command implementations (run, serve, status, config)
//! - `wiring`: construction of the concrete providers, storage, and
//!   config the commands drive

pub mod cli;
pub mod commands;
pub mod wiring;

pub use cli::{Cli, Commands, ConfigCommands};
pub use commands::{handle_config, run_once, serve, show_status};
pub use wiring::{build_path_resolver, build_runtime, load_bootstrap, open_storage, Runtime};
