//! Aggregation period granularity.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// A time-bucketing granularity for min/max aggregation.
///
/// # Examples
///
/// ```
/// use deforma_types::Period;
///
/// assert_eq!("week".parse::<Period>(), Ok(Period::Week));
/// assert!("century".parse::<Period>().is_err());
/// assert_eq!(Period::default(), Period::Day);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// Readings grouped by calendar hour.
    Hour,
    /// Readings grouped by calendar day.
    Day,
    /// Readings grouped by week of year.
    Week,
    /// Readings grouped by calendar month.
    Month,
}

impl Period {
    /// All supported periods, in ascending granularity order.
    pub const ALL: [Period; 4] = [Period::Hour, Period::Day, Period::Week, Period::Month];

    /// The lowercase name used on the wire.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Hour => "hour",
            Period::Day => "day",
            Period::Week => "week",
            Period::Month => "month",
        }
    }
}

impl Default for Period {
    fn default() -> Self {
        Period::Day
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Period::Hour),
            "day" => Ok(Period::Day),
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            other => Err(ParseError::InvalidPeriod(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_all_periods() {
        for period in Period::ALL {
            assert_eq!(period.as_str().parse::<Period>(), Ok(period));
        }
    }

    #[test]
    fn test_parse_rejects_unknown() {
        let err = "century".parse::<Period>().unwrap_err();
        assert_eq!(err, ParseError::InvalidPeriod("century".to_string()));
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("Day".parse::<Period>().is_err());
        assert!(" day".parse::<Period>().is_err());
    }

    #[test]
    fn test_default_is_day() {
        assert_eq!(Period::default(), Period::Day);
    }

    #[test]
    fn test_display_round_trip() {
        for period in Period::ALL {
            assert_eq!(period.to_string().parse::<Period>(), Ok(period));
        }
    }
}
