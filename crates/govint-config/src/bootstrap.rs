//! Process-bootstrap settings: where is the database, which raw-input
//! directory, what log level. Layered `defaults -> config file -> CLI
//! path -> env vars`, same precedence order and crate pair (`config` +
//! `directories`) as the teacher's `Settings::load`.
//!
//! This is distinct from [`crate::store::ConfigStore`], which holds the
//! database-backed, dotted-key runtime configuration (§4.1) read and
//! written while a cycle is running. Bootstrap settings answer "how do I
//! even open the database"; the Config Store answers "how many sentiment
//! workers should this cycle use".

use std::path::PathBuf;

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "governance-intelligence")
}

fn default_db_path() -> String {
    project_dirs()
        .map(|p| p.data_local_dir().join("db"))
        .unwrap_or_else(|| PathBuf::from("./data/db"))
        .to_string_lossy()
        .to_string()
}

fn default_raw_input_path() -> String {
    project_dirs()
        .map(|p| p.data_local_dir().join("raw"))
        .unwrap_or_else(|| PathBuf::from("./data/raw"))
        .to_string_lossy()
        .to_string()
}

fn default_model_cache_path() -> String {
    project_dirs()
        .map(|p| p.cache_dir().join("models"))
        .unwrap_or_else(|| PathBuf::from("./data/models"))
        .to_string_lossy()
        .to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Bootstrap configuration, resolved once at process start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapSettings {
    /// Path to the RocksDB storage directory.
    #[serde(default = "default_db_path")]
    pub db_path: String,

    /// Path to the directory the Raw Loader watches for collector CSVs.
    #[serde(default = "default_raw_input_path")]
    pub raw_input_path: String,

    /// Path for cached local model weights (emotion classifier).
    #[serde(default = "default_model_cache_path")]
    pub model_cache_path: String,

    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Operator id to stamp on loaded mentions when the caller doesn't
    /// override it.
    #[serde(default)]
    pub default_operator_id: Option<String>,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            raw_input_path: default_raw_input_path(),
            model_cache_path: default_model_cache_path(),
            log_level: default_log_level(),
            default_operator_id: None,
        }
    }
}

impl BootstrapSettings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Default config file (`~/.config/governance-intelligence/config.toml`)
    /// 3. CLI-specified config file (optional, required if given)
    /// 4. `GOVINT_*` environment variables (highest precedence)
    pub fn load(cli_config_path: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir = project_dirs()
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("db_path", default_db_path())?
            .set_default("raw_input_path", default_raw_input_path())?
            .set_default("model_cache_path", default_model_cache_path())?
            .set_default("log_level", default_log_level())?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = cli_config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("GOVINT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Expand `~` in any of the configured paths to the home directory.
    pub fn expanded_db_path(&self) -> PathBuf {
        expand_path(&self.db_path)
    }

    pub fn expanded_raw_input_path(&self) -> PathBuf {
        expand_path(&self.raw_input_path)
    }

    pub fn expanded_model_cache_path(&self) -> PathBuf {
        expand_path(&self.model_cache_path)
    }
}

fn expand_path(raw: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(raw).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_have_sensible_log_level() {
        let settings = BootstrapSettings::default();
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn load_with_no_files_falls_back_to_defaults() {
        let settings = BootstrapSettings::load(None).unwrap();
        assert_eq!(settings.log_level, "info");
    }

    #[test]
    fn tilde_expansion() {
        let expanded = expand_path("~/data/db");
        assert!(!expanded.to_string_lossy().starts_with('~'));
    }
}
