//! Data models for stored data.

use serde::{Deserialize, Serialize};

/// One sensor observation.
///
/// The same shape is used for insertion and for query results; the
/// surrogate row id is internal to the store and never exposed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Observation time as canonical `YYYY-MM-DD HH:MM:SS` text.
    pub time: String,
    /// Sensor identifier.
    pub sensor: String,
    /// Measured deformation value.
    pub value: f64,
}

/// Min/max of `value` within one period bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodExtremes {
    /// Sensor identifier.
    pub sensor: String,
    /// Bucket label, e.g. `2024-01-15` for a day bucket.
    pub period: String,
    /// Smallest value in the bucket.
    pub min_value: f64,
    /// Largest value in the bucket.
    pub max_value: f64,
}
