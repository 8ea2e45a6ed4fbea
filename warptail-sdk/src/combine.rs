//! Service-level concatenation of route series.

use warptail_types::TimeSeries;

/// Concatenate two series into one.
///
/// Points from both inputs are kept as separate entries and stably sorted
/// by timestamp; points sharing an instant are not summed. Totals are added.
///
/// ```rust
/// use warptail_sdk::concat_series;
/// use warptail_types::TimeSeries;
///
/// let a = TimeSeries::builder().point_at_millis(2_000, 1.0, 0.0).total(1.0, 0.0).build();
/// let b = TimeSeries::builder().point_at_millis(1_000, 2.0, 0.0).total(2.0, 0.0).build();
///
/// let combined = concat_series(&a, &b);
/// assert_eq!(combined.len(), 2);
/// assert_eq!(combined.points[0].timestamp.timestamp_millis(), 1_000);
/// assert_eq!(combined.total.sent, 3.0);
/// ```
pub fn concat_series(a: &TimeSeries, b: &TimeSeries) -> TimeSeries {
    let mut points: Vec<_> = a.points.iter().chain(b.points.iter()).copied().collect();
    points.sort_by_key(|p| p.timestamp);

    TimeSeries::new(points, a.total + b.total)
}
