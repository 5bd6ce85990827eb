//! Canonical timestamp handling.
//!
//! Readings are stored with their time as text in `YYYY-MM-DD HH:MM:SS`
//! form, so lexicographic comparison of stored values is chronological
//! comparison. [`parse_timestamp`] is the strict parser for stored text;
//! [`parse_csv_timestamp`] additionally accepts the formats that show up
//! in semicolon/comma-decimal CSV exports and normalizes them.

use time::PrimitiveDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::error::ParseError;

/// The storage format: `YYYY-MM-DD HH:MM:SS`.
pub const TIME_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

const DOTTED_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]:[second]");

/// Parse a stored timestamp, strictly.
pub fn parse_timestamp(s: &str) -> Result<PrimitiveDateTime, ParseError> {
    PrimitiveDateTime::parse(s, TIME_FORMAT)
        .map_err(|_| ParseError::InvalidTimestamp(s.to_string()))
}

/// Parse a timestamp as it appears in a source CSV.
///
/// Accepts the canonical storage form plus the dotted day-first
/// variant common in the exports this loader sees. Seconds may be
/// omitted in either form.
pub fn parse_csv_timestamp(s: &str) -> Result<PrimitiveDateTime, ParseError> {
    let s = s.trim();
    for format in [TIME_FORMAT, DOTTED_FORMAT] {
        if let Ok(dt) = PrimitiveDateTime::parse(s, format) {
            return Ok(dt);
        }
    }

    // Exports often stop at the minute; retry with seconds appended.
    let padded = format!("{s}:00");
    for format in [TIME_FORMAT, DOTTED_FORMAT] {
        if let Ok(dt) = PrimitiveDateTime::parse(&padded, format) {
            return Ok(dt);
        }
    }

    Err(ParseError::InvalidTimestamp(s.to_string()))
}

/// Format a timestamp in the canonical storage form.
pub fn format_timestamp(dt: PrimitiveDateTime) -> String {
    dt.format(TIME_FORMAT).expect("canonical format")
}
