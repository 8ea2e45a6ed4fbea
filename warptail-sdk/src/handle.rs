//! Route handle for recording traffic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use warptail_types::{ProxyStats, TimeSeries};

use crate::state::TrafficRecorder;

/// A handle for recording traffic on a specific route.
///
/// Obtain a handle by calling `Registry::register()`. Handles are cheap to
/// clone and every clone writes to the same series.
///
/// # Example
///
/// ```rust
/// use warptail_sdk::Registry;
///
/// let registry = Registry::new();
/// let handle = registry.register(1);
///
/// // Bytes forwarded to the upstream machine
/// handle.record_sent(1500);
///
/// // Bytes returned to the client
/// handle.record_received(320);
///
/// assert_eq!(handle.snapshot().total.received, 320.0);
/// ```
#[derive(Debug, Clone)]
pub struct RouteHandle {
    pub(crate) recorder: Arc<TrafficRecorder>,
    pub(crate) key: u32,
}

impl RouteHandle {
    /// Record bytes sent to the upstream.
    pub fn record_sent(&self, bytes: u64) {
        self.recorder.record_sent(bytes);
    }

    /// Record bytes received from the upstream.
    pub fn record_received(&self, bytes: u64) {
        self.recorder.record_received(bytes);
    }

    /// Record a sample at an explicit instant.
    pub fn record_at(&self, at: DateTime<Utc>, stats: ProxyStats) {
        self.recorder.record_at(at, stats);
    }

    /// Copy out this route's series.
    pub fn snapshot(&self) -> TimeSeries {
        self.recorder.snapshot()
    }

    /// The route key this handle records for.
    pub fn key(&self) -> u32 {
        self.key
    }
}
