//! Error types for deforma-types.

/// Errors from parsing user- or file-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The string is not one of the supported period names.
    #[error("Invalid period: {0:?}")]
    InvalidPeriod(String),

    /// The string does not match any supported timestamp format.
    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),
}
