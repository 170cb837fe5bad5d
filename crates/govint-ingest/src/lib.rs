//! # govint-ingest
//!
//! The Raw Loader (C11): reads collector-produced CSV files from the raw
//! data directory into `pending` `Mention` records, insensitive to file
//! ordering and to which collector produced a given file.

pub mod error;
pub mod loader;
pub mod record;

pub use error::IngestError;
pub use loader::{load_raw_directory, LoadSummary};
pub use record::{parse_source_type, record_to_mention, RawCsvRecord};
