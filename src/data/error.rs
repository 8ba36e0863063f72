//! Error types for dataset loading
//!
//! Every loader returns `DataResult<T>`; the dispatch layer maps any of these
//! to an internal server error.

use thiserror::Error;

pub use crate::constants::MAX_DATA_FILE_SIZE_MB;

/// Errors that can occur while loading a dataset from disk
#[derive(Error, Debug)]
pub enum DataError {
    /// IO error from std::io
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error from serde_json
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error raised by the CSV reader
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// File is too large to load per request
    #[error("File too large: {size_mb}MB (max {max_mb}MB)")]
    TooLarge { size_mb: u64, max_mb: usize },

    /// File is empty
    #[error("Empty file")]
    EmptyFile,

    /// Shape of the document does not describe a table
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type alias for data operations
pub type DataResult<T> = Result<T, DataError>;
