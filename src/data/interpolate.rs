//! Gap filling and smoothing for a single route's traffic series.
//!
//! The chart shows a trailing window of traffic. Samples inside the window
//! are sorted, any gap longer than the sampling interval is filled with
//! linearly interpolated points, and the result is smoothed with a causal
//! moving average so live updates never revise points already drawn.

use chrono::{DateTime, TimeDelta, Utc};
use warptail_types::{ProxyStats, TimeSeriesPoint};

/// Window, sampling interval and smoothing width for chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesConfig {
    /// How far back from the reference instant points are kept.
    pub window: TimeDelta,
    /// Expected spacing between samples; longer gaps are filled.
    pub interval: TimeDelta,
    /// Number of trailing samples averaged per output point.
    pub smoothing: usize,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            window: TimeDelta::minutes(10),
            interval: TimeDelta::seconds(60),
            smoothing: 3,
        }
    }
}

/// Produce the chart-ready series for the window ending at `now`.
///
/// Returns an empty Vec when no point falls inside the window.
///
/// ```
/// use chrono::{TimeDelta, TimeZone, Utc};
/// use warptail_stats::data::{recent_series, SeriesConfig};
/// use warptail_types::{ProxyStats, TimeSeriesPoint};
///
/// let now = Utc.with_ymd_and_hms(2025, 4, 11, 12, 0, 0).unwrap();
/// let t0 = now - TimeDelta::minutes(5);
/// let points = vec![
///     TimeSeriesPoint::new(t0, ProxyStats::new(0.0, 0.0)),
///     TimeSeriesPoint::new(t0 + TimeDelta::seconds(180), ProxyStats::new(300.0, 150.0)),
/// ];
///
/// let series = recent_series(&points, now, &SeriesConfig::default());
/// assert_eq!(series.len(), 4);
/// ```
pub fn recent_series(
    points: &[TimeSeriesPoint],
    now: DateTime<Utc>,
    config: &SeriesConfig,
) -> Vec<TimeSeriesPoint> {
    let in_window = window_filter(points, now, config.window);
    if in_window.is_empty() {
        return Vec::new();
    }

    let filled = fill_gaps(&in_window, config.interval);
    moving_average(&filled, config.smoothing)
}

/// Keep points at or after `now - window`, sorted by timestamp.
///
/// The sort is stable, so points sharing an instant keep their input order.
pub fn window_filter(
    points: &[TimeSeriesPoint],
    now: DateTime<Utc>,
    window: TimeDelta,
) -> Vec<TimeSeriesPoint> {
    let window_start = now.checked_sub_signed(window).unwrap_or(DateTime::<Utc>::MIN_UTC);

    let mut kept: Vec<TimeSeriesPoint> = points
        .iter()
        .filter(|p| p.timestamp >= window_start)
        .copied()
        .collect();
    kept.sort_by_key(|p| p.timestamp);
    kept
}

/// Fill gaps longer than `interval` with interpolated points.
///
/// For a gap between `prev` and `curr`, `steps = floor(gap / interval)`
/// points are placed at `prev + j * interval`, valued at fraction
/// `j / steps` of the way from `prev` to `curr`. The fraction is by step
/// index, not elapsed time, so when the gap is not a whole number of
/// intervals the last synthetic point already carries `curr`'s value.
/// A synthetic point that would land on or after `curr` is not emitted.
///
/// The dashboard's browser chart does emit that coincident point, so a
/// 0s/180s pair at a 60s interval draws 5 points there (two at 180s). Here
/// it is suppressed and the same pair yields 4 points with unique instants.
///
/// Non-positive or sub-millisecond intervals return the input unchanged.
pub fn fill_gaps(points: &[TimeSeriesPoint], interval: TimeDelta) -> Vec<TimeSeriesPoint> {
    let Some(first) = points.first() else {
        return Vec::new();
    };

    let interval_ms = interval.num_milliseconds();
    if interval_ms <= 0 {
        return points.to_vec();
    }

    let mut out = Vec::with_capacity(points.len());
    out.push(*first);

    for pair in points.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        let gap_ms = (curr.timestamp - prev.timestamp).num_milliseconds();

        if gap_ms > interval_ms {
            let steps = gap_ms / interval_ms;
            for j in 1..=steps {
                let Some(timestamp) = TimeDelta::try_milliseconds(interval_ms.saturating_mul(j))
                    .and_then(|offset| prev.timestamp.checked_add_signed(offset))
                else {
                    break;
                };
                if timestamp >= curr.timestamp {
                    break;
                }

                let fraction = j as f64 / steps as f64;
                out.push(TimeSeriesPoint::new(
                    timestamp,
                    lerp(prev.value, curr.value, fraction),
                ));
            }
        }

        out.push(curr);
    }

    out
}

/// Trailing moving average over at most `window` samples.
///
/// The first points average over however many samples exist so far.
/// A window of zero is treated as one (no smoothing).
pub fn moving_average(points: &[TimeSeriesPoint], window: usize) -> Vec<TimeSeriesPoint> {
    let window = window.max(1);

    points
        .iter()
        .enumerate()
        .map(|(i, point)| {
            let start = (i + 1).saturating_sub(window);
            let samples = &points[start..=i];
            let sum: ProxyStats = samples.iter().map(|p| p.value).sum();
            let count = samples.len() as f64;

            TimeSeriesPoint::new(
                point.timestamp,
                ProxyStats::new(sum.sent / count, sum.received / count),
            )
        })
        .collect()
}

/// Linear interpolation applied to each channel independently.
fn lerp(from: ProxyStats, to: ProxyStats, fraction: f64) -> ProxyStats {
    ProxyStats {
        sent: from.sent + (to.sent - from.sent) * fraction,
        received: from.received + (to.received - from.received) * fraction,
    }
}
