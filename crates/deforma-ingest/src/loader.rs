//! CSV parsing and loading.

use std::fs::File;
use std::path::Path;

use tracing::{info, warn};

use deforma_store::{Reading, Store};
use deforma_types::{format_timestamp, parse_csv_timestamp};

use crate::error::{Error, Result};

/// Outcome of one CSV load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Readings inserted into the store.
    pub inserted: usize,
    /// Data rows dropped because their timestamp failed to parse.
    pub skipped_rows: usize,
}

/// Parse a source CSV into readings.
///
/// Returns the readings plus the count of rows skipped for an
/// unparseable timestamp. A numeric field that fails to parse is a
/// hard error: the whole batch is abandoned.
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<(Vec<Reading>, usize)> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .from_reader(file);

    // The first column is the timestamp whatever its header says;
    // every other header's first whitespace token is a sensor id.
    let headers = reader.headers()?.clone();
    let sensors: Vec<String> = headers.iter().skip(1).map(sensor_id).collect();

    let mut readings = Vec::new();
    let mut skipped_rows = 0usize;

    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        let row = idx + 1;

        let raw_time = record.get(0).unwrap_or("");
        let time = match parse_csv_timestamp(raw_time) {
            Ok(dt) => format_timestamp(dt),
            Err(_) => {
                warn!(row, value = raw_time, "skipping row with unparseable timestamp");
                skipped_rows += 1;
                continue;
            }
        };

        for (col, sensor) in sensors.iter().enumerate() {
            let raw = record.get(col + 1).unwrap_or("");
            let value = parse_value(raw).ok_or_else(|| Error::InvalidValue {
                row,
                sensor: sensor.clone(),
                value: raw.to_string(),
            })?;
            readings.push(Reading {
                time: time.clone(),
                sensor: sensor.clone(),
                value,
            });
        }
    }

    Ok((readings, skipped_rows))
}

/// Load a source CSV into the store and report the counts.
///
/// Parsing completes before the insert transaction starts, so an
/// aborted load commits nothing.
pub fn load_csv<P: AsRef<Path>>(store: &mut Store, path: P) -> Result<IngestReport> {
    let (readings, skipped_rows) = parse_csv(path)?;
    let inserted = store.insert_readings(&readings)?;

    info!(inserted, skipped_rows, "CSV load complete");
    Ok(IngestReport {
        inserted,
        skipped_rows,
    })
}

/// Sensor identifier: the first whitespace-delimited token of a
/// column header, e.g. `"S1 (mm)"` -> `"S1"`.
fn sensor_id(header: &str) -> String {
    header.split_whitespace().next().unwrap_or("").to_string()
}

/// Numeric field with comma as the decimal separator.
fn parse_value(raw: &str) -> Option<f64> {
    raw.replace(',', ".").parse().ok()
}
