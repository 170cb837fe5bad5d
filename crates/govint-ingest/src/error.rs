//! Raw Loader errors. A malformed row is skipped and counted, never fatal
//! to the run; only filesystem/storage failures abort it.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("failed to read raw directory {path}: {source}")]
    ReadDir { path: String, source: std::io::Error },

    #[error("failed to move processed file {path}: {source}")]
    MoveFile { path: String, source: std::io::Error },

    #[error("csv error in {path}: {source}")]
    Csv { path: String, source: csv::Error },
}
