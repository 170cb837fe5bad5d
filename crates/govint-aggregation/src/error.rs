//! Aggregation/trend/baseline errors: storage passthrough plus the data
//! class from the error taxonomy for referential anomalies.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AggregationError {
    #[error("storage error: {0}")]
    Storage(#[from] govint_storage::StorageError),

    #[error("no aggregation found for {aggregation_key} over {window}")]
    MissingAggregation { aggregation_key: String, window: String },
}
