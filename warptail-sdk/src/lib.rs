//! # warptail-sdk
//!
//! Traffic recording for warptail routes.
//!
//! Proxies call into a [`RouteHandle`] every time bytes cross a route; the
//! [`Registry`] turns those calls into the bucketed, size-capped
//! [`TimeSeries`] the dashboard reads.
//!
//! ## Quick Start
//!
//! ```rust
//! use warptail_sdk::Registry;
//!
//! let registry = Registry::new();
//! let handle = registry.register(0);
//!
//! // Record traffic as the proxy copies bytes
//! handle.record_sent(1024);
//! handle.record_received(4096);
//!
//! // Per-route series for the dashboard
//! let routes = registry.routes();
//! assert_eq!(routes.len(), 1);
//!
//! // Service-level series: every route's points, totals summed
//! let service = registry.combined();
//! assert_eq!(service.total.received, 4096.0);
//! ```
//!
//! ## Recording model
//!
//! - Each sample's instant is truncated to the registry's bucket width
//! - A sample landing in the newest point's bucket is added into it
//! - The oldest point is evicted once the cap is exceeded
//! - `total` is the sum of the retained points
//! - Thread-safe: handles can be cloned into any thread

mod combine;
mod handle;
mod registry;
mod state;

pub use combine::concat_series;
pub use handle::RouteHandle;
pub use registry::{Registry, RegistryBuilder};
pub use state::TrafficRecorder;

// Re-export types for convenience
pub use warptail_types::{ProxyStats, Route, TimeSeries, TimeSeriesPoint};
