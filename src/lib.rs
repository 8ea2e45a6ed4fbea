//! # warptail-stats
//!
//! Traffic time-series engine for the warptail dashboard.
//!
//! Routes proxied by warptail report sparse byte-counter samples. This
//! crate turns them into what the dashboard chart draws: a trailing
//! window of evenly spaced, gap-filled, smoothed points for one route or
//! for the summary of every route, with human-readable totals.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐   ┌──────────────────┐   ┌────────────────────────────┐
//! │  source  │──▶│ DashboardData    │──▶│ data                       │
//! │ (file)   │   │ (SamplePolicy)   │   │ select → summarize         │
//! └──────────┘   └──────────────────┘   │ recent_series → ChartView  │
//!                                       └────────────────────────────┘
//! ```
//!
//! - **[`source`]**: [`DataSource`] trait and [`FileSource`] polling of
//!   service snapshot JSON
//! - **[`data`]**: formatters, interpolation, aggregation, selection and
//!   chart assembly
//! - **[`settings`]**: layered [`Settings`] from file and environment
//! - **[`logging`]**: subscriber setup for the command-line tool
//!
//! ## Example
//!
//! ```
//! use chrono::{DateTime, TimeDelta};
//! use warptail_stats::{build_chart, DashboardData, RouteSelection, SamplePolicy, SeriesConfig};
//!
//! let json = r#"{
//!     "name": "grafana",
//!     "enabled": true,
//!     "routes": [{
//!         "type": "http",
//!         "domain": "grafana.example.com",
//!         "stats": {
//!             "points": [
//!                 { "timestamp": 1744400800000, "value": { "sent": 0, "received": 0 } },
//!                 { "timestamp": 1744400980000, "value": { "sent": 300, "received": 150 } }
//!             ],
//!             "total": { "sent": 1536, "received": 512 }
//!         }
//!     }]
//! }"#;
//!
//! let data = DashboardData::parse(json, SamplePolicy::Drop).unwrap();
//! let service = data.service(None).unwrap();
//! let now = DateTime::from_timestamp_millis(1_744_400_980_000).unwrap() + TimeDelta::minutes(1);
//!
//! let view = build_chart(&service.routes, &RouteSelection::Route(0), now, &SeriesConfig::default());
//! assert_eq!(view.label, "grafana.example.com");
//! assert_eq!(view.points.len(), 4);
//! assert_eq!(view.total_sent, "2 KB");
//! ```

pub mod data;
pub mod logging;
pub mod settings;
pub mod source;

pub use data::{
    build_chart, format_bytes, format_duration, format_x_axis, recent_series, select, summarize,
    ChartView, DashboardData, RouteSelection, SamplePolicy, Selection, SeriesConfig,
};
pub use settings::{Settings, SettingsError, SettingsOverrides};
pub use source::{DataSource, FileSource, ServiceSnapshot, SnapshotDocument};
