//! # warptail-types
//!
//! Core types for warptail traffic telemetry. Proxied routes report
//! byte counters over time; this crate defines the value types shared by
//! the recorder that produces them and the dashboard engine that turns
//! them into chart-ready series.
//!
//! ## Features
//!
//! - `serde`: JSON (and other format) serialization via serde. Timestamps
//!   serialize as RFC 3339 strings.
//!
//! ## Example
//!
//! ```rust
//! use warptail_types::{ProxyStats, Route, TimeSeries};
//!
//! let stats = TimeSeries::builder()
//!     .point_at_millis(1_700_000_000_000, 1536.0, 512.0)
//!     .total(1536.0, 512.0)
//!     .build();
//!
//! let route = Route {
//!     domain: Some("grafana.example.com".into()),
//!     stats: Some(stats),
//!     ..Default::default()
//! };
//!
//! assert!(route.has_samples());
//! assert_eq!(route.stats.unwrap().total, ProxyStats::new(1536.0, 512.0));
//! ```

mod error;
mod route;
mod series;
mod stats;
mod timestamp;

pub use error::*;
pub use route::*;
pub use series::*;
pub use stats::*;
pub use timestamp::*;
