//! Traffic series processing for the dashboard chart.
//!
//! ## Submodules
//!
//! - [`format`]: Byte counts and axis tick labels
//! - [`duration`]: Duration strings for settings and latency display
//! - [`interpolate`]: Window filter, gap filling and smoothing ([`SeriesConfig`])
//! - [`aggregate`]: Summary series across routes
//! - [`select`]: Route selection and labels
//! - [`chart`]: Chart-ready output ([`ChartView`])
//! - [`dashboard`]: Validated services from snapshots ([`DashboardData`])
//!
//! ## Data Flow
//!
//! ```text
//! ServiceSnapshot (raw JSON)
//!        │
//!        ▼
//! DashboardData::from_snapshot()   (SamplePolicy)
//!        │
//!        ▼
//! select()  ──▶ summarize() for "all"
//!        │
//!        ▼
//! recent_series()  window → fill gaps → moving average
//!        │
//!        ▼
//! ChartView (format_bytes totals)
//! ```

pub mod aggregate;
pub mod chart;
pub mod dashboard;
pub mod duration;
pub mod format;
pub mod interpolate;
pub mod select;

pub use aggregate::summarize;
pub use chart::{build_chart, ChartView};
pub use dashboard::{DashboardData, SamplePolicy};
pub use duration::{format_duration, parse_duration};
pub use format::{format_bytes, format_time, format_x_axis};
pub use interpolate::{fill_gaps, moving_average, recent_series, window_filter, SeriesConfig};
pub use select::{route_label, select, RouteSelection, Selection, NO_DATA_LABEL, SUMMARY_LABEL};
