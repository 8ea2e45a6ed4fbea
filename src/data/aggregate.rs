//! Summary series across a service's routes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use warptail_types::{truncate_to_millis, ProxyStats, Route, TimeSeries, TimeSeriesPoint};

/// Combine the series of every reporting route into one summary series.
///
/// Only routes with stats and at least one point take part. Points whose
/// instants are identical (to the millisecond) are summed channel by
/// channel; all other points stay separate entries. The result is sorted
/// by time. `total` is the sum of the routes' reported totals.
///
/// Routes sampled at different instants are not merged into a single
/// curve: each keeps its own points in the summary.
pub fn summarize(routes: &[Route]) -> TimeSeries {
    let reporting: Vec<&TimeSeries> = routes
        .iter()
        .filter_map(|route| route.stats.as_ref())
        .filter(|stats| !stats.is_empty())
        .collect();

    if reporting.is_empty() {
        return TimeSeries::empty();
    }

    let total = reporting.iter().map(|stats| stats.total).sum();

    let mut merged: BTreeMap<DateTime<Utc>, ProxyStats> = BTreeMap::new();
    for point in reporting.iter().flat_map(|stats| stats.points.iter()) {
        merged
            .entry(truncate_to_millis(point.timestamp))
            .and_modify(|value| *value += point.value)
            .or_insert(point.value);
    }

    let points = merged
        .into_iter()
        .map(|(timestamp, value)| TimeSeriesPoint::new(timestamp, value))
        .collect();

    TimeSeries::new(points, total)
}
