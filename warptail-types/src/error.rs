//! Errors for samples that cannot be placed on a time axis.

use thiserror::Error;

/// A traffic sample that failed validation at the ingestion boundary.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedSampleError {
    /// Timestamp string could not be parsed.
    #[error("malformed timestamp {value:?}: {reason}")]
    Timestamp { value: String, reason: String },

    /// Epoch milliseconds outside the representable date range.
    #[error("timestamp {millis}ms is out of range")]
    OutOfRange { millis: i64 },

    /// Byte counters that are negative or not finite.
    #[error("invalid byte counts at {timestamp}: sent={sent}, received={received}")]
    InvalidValue {
        timestamp: String,
        sent: f64,
        received: f64,
    },
}
