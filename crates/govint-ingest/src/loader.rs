//! The Raw Loader (C11): walks the raw-data directory's CSV files and
//! turns each row into a `pending` `Mention` row in storage. Insensitive
//! to file ordering or which collector produced a given file — every
//! `.csv` file sitting directly under the raw directory is fair game.

use std::fs;
use std::path::Path;

use govint_storage::Storage;
use tracing::{instrument, warn};

use crate::error::IngestError;
use crate::record::{record_to_mention, RawCsvRecord};

/// Tally of one loader run, folded into the Raw Loader's contribution to
/// the cycle summary.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoadSummary {
    pub files_processed: usize,
    pub mentions_loaded: usize,
    pub rows_skipped: usize,
}

impl LoadSummary {
    fn merge(&mut self, other: LoadSummary) {
        self.files_processed += other.files_processed;
        self.mentions_loaded += other.mentions_loaded;
        self.rows_skipped += other.rows_skipped;
    }
}

/// Load every `.csv` file directly under `raw_input_path` into `storage`,
/// then move each consumed file into `raw_processed_path` so a crashed
/// run never double-ingests it.
#[instrument(skip(storage), fields(operator_id))]
pub fn load_raw_directory(storage: &Storage, raw_input_path: &Path, raw_processed_path: &Path, operator_id: &str) -> Result<LoadSummary, IngestError> {
    let mut summary = LoadSummary::default();

    let entries = fs::read_dir(raw_input_path).map_err(|source| IngestError::ReadDir {
        path: raw_input_path.display().to_string(),
        source,
    })?;

    let mut csv_paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::ReadDir {
            path: raw_input_path.display().to_string(),
            source,
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "csv") {
            csv_paths.push(path);
        }
    }
    csv_paths.sort();

    if !csv_paths.is_empty() {
        fs::create_dir_all(raw_processed_path).map_err(|source| IngestError::MoveFile {
            path: raw_processed_path.display().to_string(),
            source,
        })?;
    }

    for path in csv_paths {
        let file_summary = load_one_file(storage, &path, operator_id)?;
        summary.merge(file_summary);

        if let Some(file_name) = path.file_name() {
            let dest = raw_processed_path.join(file_name);
            fs::rename(&path, &dest).map_err(|source| IngestError::MoveFile {
                path: path.display().to_string(),
                source,
            })?;
        }
    }

    Ok(summary)
}

fn load_one_file(storage: &Storage, path: &Path, operator_id: &str) -> Result<LoadSummary, IngestError> {
    let mut summary = LoadSummary::default();
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Csv {
        path: path.display().to_string(),
        source,
    })?;

    for result in reader.deserialize::<RawCsvRecord>() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping malformed raw row");
                summary.rows_skipped += 1;
                continue;
            }
        };

        match record_to_mention(&record, operator_id) {
            Ok(mention) => {
                storage.put_mention(&mention)?;
                summary.mentions_loaded += 1;
            }
            Err(reason) => {
                warn!(path = %path.display(), reason, "skipping unusable raw row");
                summary.rows_skipped += 1;
            }
        }
    }

    summary.files_processed = 1;
    Ok(summary)
}
