//! Calendar field derivation from trip start timestamps.

use chrono::{Datelike, NaiveDateTime, Timelike};

use crate::error::EngineError;

/// Timestamp format used by the city datasets.
pub const START_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parses a raw start-time string.
///
/// # Errors
///
/// Returns [`EngineError::MalformedTimestamp`] (carrying the offending row
/// index and value) when the string does not match [`START_TIME_FORMAT`].
pub fn parse_start_time(value: &str, row: usize) -> Result<NaiveDateTime, EngineError> {
    NaiveDateTime::parse_from_str(value, START_TIME_FORMAT).map_err(|source| {
        EngineError::MalformedTimestamp {
            row,
            value: value.to_string(),
            source,
        }
    })
}

/// Derives `(month, weekday, start_hour)` from a parsed start time.
///
/// Month is 1-based (1 = January), weekday is Monday=0 through Sunday=6,
/// hour is 0–23. Pure: the same timestamp always yields the same tuple.
pub fn derive_fields(start_time: &NaiveDateTime) -> (u32, u32, u32) {
    (
        start_time.month(),
        start_time.weekday().num_days_from_monday(),
        start_time.hour(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_timestamp() {
        let ts = parse_start_time("2017-01-01 00:07:57", 0).unwrap();
        assert_eq!(derive_fields(&ts), (1, 6, 0)); // 2017-01-01 was a Sunday
    }

    #[test]
    fn test_parse_malformed_timestamp() {
        let err = parse_start_time("01/06/2017 9:15", 3).unwrap_err();
        match err {
            EngineError::MalformedTimestamp { row, value, .. } => {
                assert_eq!(row, 3);
                assert_eq!(value, "01/06/2017 9:15");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_weekday_is_monday_based() {
        // 2017-06-05 was a Monday, 2017-06-11 a Sunday.
        let mon = parse_start_time("2017-06-05 08:00:00", 0).unwrap();
        let sun = parse_start_time("2017-06-11 23:59:59", 0).unwrap();
        assert_eq!(derive_fields(&mon), (6, 0, 8));
        assert_eq!(derive_fields(&sun), (6, 6, 23));
    }

    #[test]
    fn test_derivation_is_deterministic() {
        let ts = parse_start_time("2017-03-15 17:30:00", 0).unwrap();
        assert_eq!(derive_fields(&ts), derive_fields(&ts));
    }
}
