//! The Path Resolver (C2): canonical filesystem locations derived from
//! the Config Store, handed around as an explicit capability rather than
//! a module-level singleton (§9 redesign note).

use std::path::PathBuf;

use crate::bootstrap::BootstrapSettings;

/// Canonical filesystem locations for one process. Constructed once in
/// the Cycle Driver and passed down to whatever needs a path, instead of
/// being re-derived ad hoc at each call site.
#[derive(Debug, Clone)]
pub struct PathResolver {
    db_path: PathBuf,
    raw_input_path: PathBuf,
    model_cache_path: PathBuf,
}

impl PathResolver {
    pub fn from_bootstrap(settings: &BootstrapSettings) -> Self {
        Self {
            db_path: settings.expanded_db_path(),
            raw_input_path: settings.expanded_raw_input_path(),
            model_cache_path: settings.expanded_model_cache_path(),
        }
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn raw_input_path(&self) -> &PathBuf {
        &self.raw_input_path
    }

    pub fn model_cache_path(&self) -> &PathBuf {
        &self.model_cache_path
    }

    /// Raw CSVs already claimed by a loader run are moved here so a
    /// crashed run can be resumed without double-ingesting a file.
    pub fn raw_processed_path(&self) -> PathBuf {
        self.raw_input_path.join("processed")
    }

    /// Topic seed directory, fed to `crate::seeds::load_topic_seeds`.
    pub fn topic_seeds_path(&self) -> PathBuf {
        self.raw_input_path
            .parent()
            .map(|p| p.join("topic_seeds"))
            .unwrap_or_else(|| PathBuf::from("./topic_seeds"))
    }
}
