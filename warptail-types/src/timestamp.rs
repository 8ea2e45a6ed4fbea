//! Timestamp normalization.
//!
//! Samples arrive either as ISO-8601 strings or as epoch milliseconds.
//! Every accepted form is converted to a UTC instant with millisecond
//! precision, which is the precision the chart layer works in.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};

use crate::MalformedSampleError;

/// Formats accepted for ISO-8601 date-times without an offset.
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a timestamp string into a UTC instant.
///
/// Accepted forms:
/// - RFC 3339 with an offset or `Z` (`2025-04-11T20:49:40.236+01:00`)
/// - date-time without an offset, read as local time (`2025-04-11T20:49:40`)
/// - a bare date, read as UTC midnight (`2025-04-11`)
///
/// Sub-millisecond digits are discarded.
///
/// ```
/// use warptail_types::parse_timestamp;
///
/// let ts = parse_timestamp("2025-04-11T19:49:40.236987Z").unwrap();
/// assert_eq!(ts.timestamp_millis() % 1000, 236);
/// assert!(parse_timestamp("yesterday").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, MalformedSampleError> {
    let trimmed = value.trim();

    let rfc3339_err = match DateTime::parse_from_rfc3339(trimmed) {
        Ok(ts) => return Ok(truncate_to_millis(ts.with_timezone(&Utc))),
        Err(e) => e,
    };

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            // Skipped local times (DST gaps) have no instant.
            return Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|ts| truncate_to_millis(ts.with_timezone(&Utc)))
                .ok_or_else(|| MalformedSampleError::Timestamp {
                    value: value.to_string(),
                    reason: String::from("local time does not exist"),
                });
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight));
        }
    }

    Err(MalformedSampleError::Timestamp {
        value: value.to_string(),
        reason: rfc3339_err.to_string(),
    })
}

/// Convert epoch milliseconds into a UTC instant.
pub fn timestamp_from_millis(millis: i64) -> Result<DateTime<Utc>, MalformedSampleError> {
    DateTime::from_timestamp_millis(millis).ok_or(MalformedSampleError::OutOfRange { millis })
}

/// Drop everything below the millisecond.
pub fn truncate_to_millis(ts: DateTime<Utc>) -> DateTime<Utc> {
    let nanos = ts.nanosecond();
    ts.with_nanosecond(nanos - nanos % 1_000_000).unwrap_or(ts)
}
