//! Chart-ready output for a selected route or summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use warptail_types::{Route, TimeSeriesPoint};

use super::format::{format_bytes, format_time};
use super::interpolate::{recent_series, SeriesConfig};
use super::select::{select, RouteSelection};

/// What the chart layer draws: a labelled, smoothed series plus the
/// formatted totals shown above it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartView {
    pub label: String,
    pub points: Vec<TimeSeriesPoint>,
    pub total_sent: String,
    pub total_received: String,
}

impl ChartView {
    /// Check if there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Display rows of `(tick, sent, received)`.
    pub fn rows(&self) -> impl Iterator<Item = (String, String, String)> + '_ {
        self.points.iter().map(|point| {
            (
                format_time(point.timestamp),
                format_bytes(point.value.sent),
                format_bytes(point.value.received),
            )
        })
    }
}

/// Select, window, fill and smooth a series for display at `now`.
///
/// Totals are taken from the selected series' reported total, not from
/// the windowed points.
pub fn build_chart(
    routes: &[Route],
    selection: &RouteSelection,
    now: DateTime<Utc>,
    config: &SeriesConfig,
) -> ChartView {
    let selected = select(routes, selection);
    let points = recent_series(&selected.series.points, now, config);

    debug!(
        label = %selected.label,
        input = selected.series.len(),
        output = points.len(),
        "Built chart series"
    );

    ChartView {
        label: selected.label,
        points,
        total_sent: format_bytes(selected.series.total.sent),
        total_received: format_bytes(selected.series.total.received),
    }
}
