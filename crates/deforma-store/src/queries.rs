//! Query builder for raw readings.
//!
//! [`ReadingFilter`] follows the builder pattern: every filter is
//! optional, unset filters are simply not applied, and the time bounds
//! are compared as text against the stored `YYYY-MM-DD HH:MM:SS` form
//! (lexicographic order on that form is chronological order).
//!
//! # Example
//!
//! ```
//! use deforma_store::{ReadingFilter, Store};
//!
//! let store = Store::open_in_memory()?;
//!
//! let filter = ReadingFilter::new()
//!     .sensor("S1")
//!     .since("2024-01-01 00:00:00")
//!     .until("2024-01-31 23:59:59");
//! let readings = store.query_readings(&filter)?;
//! # Ok::<(), deforma_store::Error>(())
//! ```

/// Fluent filter for [`Store::query_readings`](crate::Store::query_readings).
///
/// Results are returned in insertion order. Both time bounds are
/// inclusive.
#[derive(Debug, Default, Clone)]
pub struct ReadingFilter {
    /// Exact-match sensor identifier.
    pub sensor: Option<String>,
    /// Inclusive lower time bound.
    pub start_time: Option<String>,
    /// Inclusive upper time bound.
    pub end_time: Option<String>,
}

impl ReadingFilter {
    /// Create an empty filter (matches the whole table).
    pub fn new() -> Self {
        Self::default()
    }

    /// Only include readings from this sensor.
    pub fn sensor(mut self, sensor: &str) -> Self {
        self.sensor = Some(sensor.to_string());
        self
    }

    /// Only include readings at or after this time.
    pub fn since(mut self, time: &str) -> Self {
        self.start_time = Some(time.to_string());
        self
    }

    /// Only include readings at or before this time.
    pub fn until(mut self, time: &str) -> Self {
        self.end_time = Some(time.to_string());
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref sensor) = self.sensor {
            conditions.push("sensor = ?");
            params.push(Box::new(sensor.clone()));
        }

        if let Some(ref start) = self.start_time {
            conditions.push("time >= ?");
            params.push(Box::new(start.clone()));
        }

        if let Some(ref end) = self.end_time {
            conditions.push("time <= ?");
            params.push(Box::new(end.clone()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        format!(
            "SELECT time, sensor, value FROM deformations {} ORDER BY id",
            where_clause
        )
    }
}
