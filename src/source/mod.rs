//! Data source abstraction for receiving service snapshots.
//!
//! Snapshots arrive as the backend's JSON service documents. The engine
//! only needs the latest one on each refresh, so sources are polled.

mod file;
mod snapshot;

pub use file::FileSource;
pub use snapshot::{
    SerializedPoint, SerializedRoute, SerializedService, SerializedTimeSeries,
    SerializedTimestamp, ServiceSnapshot, SnapshotDocument,
};

use std::fmt::Debug;

/// Trait for receiving service snapshots.
///
/// # Example
///
/// ```no_run
/// use warptail_stats::{DataSource, FileSource};
///
/// let mut source = FileSource::new("services.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} services", snapshot.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Poll for the latest snapshot.
    ///
    /// Returns `Some(snapshot)` if new data is available, `None` otherwise.
    /// This method should be non-blocking.
    fn poll(&mut self) -> Option<ServiceSnapshot>;

    /// Returns a human-readable description of the source.
    fn description(&self) -> &str;

    /// Returns the error message from the last poll, if it failed.
    fn error(&self) -> Option<&str>;
}
