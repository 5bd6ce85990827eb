//! Error types for deforma-ingest.

use std::path::PathBuf;

/// Result type for deforma-ingest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a source CSV.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to open or read the source file.
    #[error("Failed to read CSV {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Malformed CSV structure.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A numeric field failed to parse. This aborts the whole load.
    #[error("Invalid value {value:?} for sensor {sensor} in data row {row}")]
    InvalidValue {
        row: usize,
        sensor: String,
        value: String,
    },

    /// Store error during insertion.
    #[error(transparent)]
    Store(#[from] deforma_store::Error),
}
