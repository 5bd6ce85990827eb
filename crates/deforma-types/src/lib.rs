//! Core types for deformation sensor readings.
//!
//! Shared between the store, the CSV loader, and the HTTP service:
//! the [`Period`] aggregation granularity and the canonical timestamp
//! format helpers.

mod error;
mod period;
mod timestamp;

pub use error::ParseError;
pub use period::Period;
pub use timestamp::{TIME_FORMAT, format_timestamp, parse_csv_timestamp, parse_timestamp};
