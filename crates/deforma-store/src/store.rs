//! Main store implementation.

use std::path::Path;

use rusqlite::Connection;
use tracing::{debug, info};

use deforma_types::Period;

use crate::error::{Error, Result};
use crate::models::{PeriodExtremes, Reading};
use crate::queries::ReadingFilter;
use crate::schema;

/// SQLite-based store for deformation readings.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    /// Append a batch of readings in one transaction.
    ///
    /// No deduplication is attempted: loading the same batch twice
    /// stores it twice. Ingestion is gated on the backing file not
    /// existing yet, so in normal operation this runs at most once.
    pub fn insert_readings(&mut self, readings: &[Reading]) -> Result<usize> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx
                .prepare("INSERT INTO deformations (time, sensor, value) VALUES (?1, ?2, ?3)")?;
            for reading in readings {
                stmt.execute(rusqlite::params![
                    reading.time,
                    reading.sensor,
                    reading.value
                ])?;
            }
        }
        tx.commit()?;

        info!("Inserted {} readings", readings.len());
        Ok(readings.len())
    }

    /// Query readings with filters, in insertion order.
    pub fn query_readings(&self, filter: &ReadingFilter) -> Result<Vec<Reading>> {
        let sql = filter.build_sql();
        let (_, params) = filter.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), |row| {
                Ok(Reading {
                    time: row.get(0)?,
                    sensor: row.get(1)?,
                    value: row.get(2)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Min/max of `value` per period bucket for one sensor.
    ///
    /// The grouping runs directly on the requested granularity, so the
    /// reported extremes are the true extremes over each full period.
    /// An unknown sensor yields an empty list.
    pub fn extremes(&self, sensor: &str, period: Period) -> Result<Vec<PeriodExtremes>> {
        let sql = format!(
            "SELECT sensor, {} AS period, MIN(value), MAX(value)
             FROM deformations WHERE sensor = ?1
             GROUP BY period ORDER BY period",
            bucket_expr(period)
        );

        debug!("Executing query: {}", sql);

        let mut stmt = self.conn.prepare(&sql)?;
        let extremes = stmt
            .query_map([sensor], |row| {
                Ok(PeriodExtremes {
                    sensor: row.get(0)?,
                    period: row.get(1)?,
                    min_value: row.get(2)?,
                    max_value: row.get(3)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(extremes)
    }

    /// Time/value pairs for one sensor in an inclusive time range,
    /// in insertion order. Used by the chart endpoint.
    pub fn series(&self, sensor: &str, start: &str, end: &str) -> Result<Vec<(String, f64)>> {
        let mut stmt = self.conn.prepare(
            "SELECT time, value FROM deformations
             WHERE sensor = ?1 AND time >= ?2 AND time <= ?3
             ORDER BY id",
        )?;

        let points = stmt
            .query_map([sensor, start, end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, f64>(1)?))
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(points)
    }

    /// Total number of stored readings.
    pub fn count_readings(&self) -> Result<u64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM deformations", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

/// SQL bucket expression for a period granularity.
///
/// Labels keep the shapes produced by strftime: hour buckets read
/// `YYYY-MM-DD HH:00:00`, day `YYYY-MM-DD`, week `YYYY-WW` (week of
/// year), month `YYYY-MM`.
fn bucket_expr(period: Period) -> &'static str {
    match period {
        Period::Hour => "strftime('%Y-%m-%d %H:00:00', time)",
        Period::Day => "strftime('%Y-%m-%d', time)",
        Period::Week => "strftime('%Y-%W', time)",
        Period::Month => "strftime('%Y-%m', time)",
    }
}
