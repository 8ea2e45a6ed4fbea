//! Registry of per-route traffic recorders.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::TimeDelta;
use parking_lot::RwLock;
use warptail_types::{Route, TimeSeries};

use crate::combine::concat_series;
use crate::handle::RouteHandle;
use crate::state::TrafficRecorder;

/// Default bucket width for new recorders, in seconds.
const DEFAULT_BUCKET_SECS: i64 = 1;

/// Default number of points each recorder keeps.
const DEFAULT_MAX_POINTS: usize = 1000;

/// The entry point for recording a service's traffic.
///
/// A registry owns one recorder per route key and produces the per-route
/// and service-level series the dashboard consumes.
///
/// # Example
///
/// ```rust
/// use chrono::TimeDelta;
/// use warptail_sdk::Registry;
///
/// let registry = Registry::builder()
///     .bucket(TimeDelta::seconds(1))
///     .max_points(600)
///     .build();
///
/// let web = registry.register(0);
/// let ssh = registry.register(1);
/// web.record_sent(4096);
/// ssh.record_sent(1024);
///
/// assert_eq!(registry.collect().len(), 2);
/// assert_eq!(registry.combined().total.sent, 5120.0);
/// ```
#[derive(Debug)]
pub struct Registry {
    routes: RwLock<BTreeMap<u32, Arc<TrafficRecorder>>>,
    bucket: TimeDelta,
    max_points: usize,
}

impl Registry {
    /// Create a registry with one-second buckets and 1000 points per route.
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(BTreeMap::new()),
            bucket: TimeDelta::seconds(DEFAULT_BUCKET_SECS),
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    /// Create a builder for configuring the registry.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Register a route and get a handle for recording its traffic.
    ///
    /// If the key is already registered, returns a handle to the existing
    /// recorder.
    pub fn register(&self, key: u32) -> RouteHandle {
        // Fast path
        {
            let routes = self.routes.read();
            if let Some(recorder) = routes.get(&key) {
                return RouteHandle {
                    recorder: recorder.clone(),
                    key,
                };
            }
        }

        // Slow path
        let mut routes = self.routes.write();
        let recorder = routes
            .entry(key)
            .or_insert_with(|| Arc::new(TrafficRecorder::new(self.bucket, self.max_points)))
            .clone();
        RouteHandle { recorder, key }
    }

    /// Remove a route's recorder. Existing handles keep working but are
    /// no longer collected.
    pub fn unregister(&self, key: u32) -> bool {
        self.routes.write().remove(&key).is_some()
    }

    /// Snapshot every route's series, keyed by route key.
    pub fn collect(&self) -> BTreeMap<u32, TimeSeries> {
        self.routes
            .read()
            .iter()
            .map(|(key, recorder)| (*key, recorder.snapshot()))
            .collect()
    }

    /// Snapshot every route as a dashboard `Route` carrying its key and stats.
    pub fn routes(&self) -> Vec<Route> {
        self.collect()
            .into_iter()
            .map(|(key, stats)| Route {
                key: Some(key),
                stats: Some(stats),
                ..Default::default()
            })
            .collect()
    }

    /// The service-level series: all routes concatenated.
    pub fn combined(&self) -> TimeSeries {
        self.collect()
            .values()
            .fold(TimeSeries::empty(), |acc, series| concat_series(&acc, series))
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `Registry`.
#[derive(Debug)]
pub struct RegistryBuilder {
    bucket: TimeDelta,
    max_points: usize,
}

impl RegistryBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            bucket: TimeDelta::seconds(DEFAULT_BUCKET_SECS),
            max_points: DEFAULT_MAX_POINTS,
        }
    }

    /// Set the bucket width samples are truncated to.
    pub fn bucket(mut self, bucket: TimeDelta) -> Self {
        self.bucket = bucket;
        self
    }

    /// Set the maximum number of points kept per route.
    pub fn max_points(mut self, max_points: usize) -> Self {
        self.max_points = max_points;
        self
    }

    /// Build the registry.
    pub fn build(self) -> Registry {
        Registry {
            routes: RwLock::new(BTreeMap::new()),
            bucket: self.bucket,
            max_points: self.max_points,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
