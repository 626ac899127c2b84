//! Error types for rn-io.

use thiserror::Error;

use rn_core::CoreError;
use rn_graph::GraphError;

/// Errors raised while reading or writing external data.
///
/// None of these can leave a previously built graph half-modified: readers
/// build a fresh graph and only return it on success.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("row {line}: {reason}")]
    InvalidRow { line: u64, reason: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

/// Alias for `Result<T, DataError>`.
pub type DataResult<T> = Result<T, DataError>;
