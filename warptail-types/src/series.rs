//! Time series of traffic observations.

use chrono::{DateTime, Utc};

use crate::{timestamp_from_millis, ProxyStats};

/// One observation of a route's traffic.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeriesPoint {
    /// When the observation was taken.
    pub timestamp: DateTime<Utc>,
    /// Bytes observed at that instant.
    pub value: ProxyStats,
}

impl TimeSeriesPoint {
    /// Create a point.
    pub const fn new(timestamp: DateTime<Utc>, value: ProxyStats) -> Self {
        Self { timestamp, value }
    }
}

/// A route's sampled traffic and its reported cumulative total.
///
/// `total` comes from the upstream source and is independent of `points`:
/// it is not required to equal their sum.
///
/// # Example
///
/// ```rust
/// use warptail_types::TimeSeries;
///
/// let series = TimeSeries::builder()
///     .point_at_millis(1_700_000_000_000, 100.0, 40.0)
///     .point_at_millis(1_700_000_060_000, 250.0, 90.0)
///     .total(4096.0, 1024.0)
///     .build();
///
/// assert_eq!(series.len(), 2);
/// assert_eq!(series.total.sent, 4096.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    /// Observations, expected in non-decreasing time order.
    #[cfg_attr(feature = "serde", serde(default))]
    pub points: Vec<TimeSeriesPoint>,
    /// Cumulative figure reported by the source.
    #[cfg_attr(feature = "serde", serde(default))]
    pub total: ProxyStats,
}

impl TimeSeries {
    /// Create a series from points and a total.
    pub fn new(points: Vec<TimeSeriesPoint>, total: ProxyStats) -> Self {
        Self { points, total }
    }

    /// A series with no points and a zero total.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a builder for a series.
    pub fn builder() -> TimeSeriesBuilder {
        TimeSeriesBuilder::new()
    }

    /// Check if the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Sum of the point values (not the reported total).
    pub fn points_sum(&self) -> ProxyStats {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Earliest and latest timestamps, if any points exist.
    pub fn span(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        let first = self.points.iter().map(|p| p.timestamp).min()?;
        let last = self.points.iter().map(|p| p.timestamp).max()?;
        Some((first, last))
    }
}

/// Builder for `TimeSeries`.
#[derive(Debug, Default)]
pub struct TimeSeriesBuilder {
    points: Vec<TimeSeriesPoint>,
    total: ProxyStats,
}

impl TimeSeriesBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a point.
    pub fn point(mut self, timestamp: DateTime<Utc>, sent: f64, received: f64) -> Self {
        self.points.push(TimeSeriesPoint::new(
            timestamp,
            ProxyStats::new(sent, received),
        ));
        self
    }

    /// Append a point at epoch milliseconds.
    ///
    /// Out-of-range instants are skipped.
    pub fn point_at_millis(self, millis: i64, sent: f64, received: f64) -> Self {
        match timestamp_from_millis(millis) {
            Ok(ts) => self.point(ts, sent, received),
            Err(_) => self,
        }
    }

    /// Set the reported total.
    pub fn total(mut self, sent: f64, received: f64) -> Self {
        self.total = ProxyStats::new(sent, received);
        self
    }

    /// Build the series.
    pub fn build(self) -> TimeSeries {
        TimeSeries {
            points: self.points,
            total: self.total,
        }
    }
}
