//! Internal state for a single route's traffic series.

use std::collections::VecDeque;

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use warptail_types::{ProxyStats, TimeSeries, TimeSeriesPoint};

/// Bucketed, size-capped series of traffic samples.
#[derive(Debug)]
pub(crate) struct SeriesState {
    points: VecDeque<TimeSeriesPoint>,
    total: ProxyStats,
    bucket: TimeDelta,
    max_points: usize,
}

impl SeriesState {
    pub(crate) fn new(bucket: TimeDelta, max_points: usize) -> Self {
        Self {
            points: VecDeque::with_capacity(max_points.min(4096)),
            total: ProxyStats::ZERO,
            bucket,
            max_points,
        }
    }

    /// Add a sample observed at `at`.
    ///
    /// Samples in the same bucket as the newest point are merged into it.
    pub(crate) fn add(&mut self, at: DateTime<Utc>, stats: ProxyStats) {
        let bucket_start = truncate(at, self.bucket);

        match self.points.back_mut() {
            Some(last) if last.timestamp == bucket_start => last.value += stats,
            _ => self
                .points
                .push_back(TimeSeriesPoint::new(bucket_start, stats)),
        }

        while self.points.len() > self.max_points {
            self.points.pop_front();
        }

        self.total = self.points.iter().map(|p| p.value).sum();
    }

    pub(crate) fn snapshot(&self) -> TimeSeries {
        TimeSeries::new(self.points.iter().copied().collect(), self.total)
    }
}

/// Truncate an instant down to a multiple of `bucket` since the epoch.
///
/// Buckets shorter than a millisecond leave the instant unchanged.
fn truncate(at: DateTime<Utc>, bucket: TimeDelta) -> DateTime<Utc> {
    let bucket_ms = bucket.num_milliseconds();
    if bucket_ms <= 0 {
        return at;
    }
    let millis = at.timestamp_millis();
    DateTime::from_timestamp_millis(millis - millis.rem_euclid(bucket_ms)).unwrap_or(at)
}

/// A thread-safe traffic recorder for one route.
///
/// # Example
///
/// ```rust
/// use chrono::TimeDelta;
/// use warptail_sdk::TrafficRecorder;
///
/// let recorder = TrafficRecorder::new(TimeDelta::seconds(1), 1000);
/// recorder.record_sent(512);
/// recorder.record_received(2048);
///
/// let series = recorder.snapshot();
/// assert_eq!(series.total.sent, 512.0);
/// assert_eq!(series.total.received, 2048.0);
/// ```
#[derive(Debug)]
pub struct TrafficRecorder {
    state: Mutex<SeriesState>,
}

impl TrafficRecorder {
    /// Create a recorder with the given bucket width and point cap.
    pub fn new(bucket: TimeDelta, max_points: usize) -> Self {
        Self {
            state: Mutex::new(SeriesState::new(bucket, max_points)),
        }
    }

    /// Record bytes sent now.
    pub fn record_sent(&self, bytes: u64) {
        self.record_at(Utc::now(), ProxyStats::sent(bytes as f64));
    }

    /// Record bytes received now.
    pub fn record_received(&self, bytes: u64) {
        self.record_at(Utc::now(), ProxyStats::received(bytes as f64));
    }

    /// Record a sample at an explicit instant.
    pub fn record_at(&self, at: DateTime<Utc>, stats: ProxyStats) {
        self.state.lock().add(at, stats);
    }

    /// Copy out the current series.
    pub fn snapshot(&self) -> TimeSeries {
        self.state.lock().snapshot()
    }
}

impl Default for TrafficRecorder {
    /// One-second buckets, 1000 points.
    fn default() -> Self {
        Self::new(TimeDelta::seconds(1), 1000)
    }
}
