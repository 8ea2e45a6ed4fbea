//! Route selection and display labels.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use warptail_types::{Route, TimeSeries};

use super::aggregate::summarize;

/// Label shown for the summary of every route.
pub const SUMMARY_LABEL: &str = "All Routes (Summary)";

/// Label shown when the selected route is missing or has no stats.
pub const NO_DATA_LABEL: &str = "No Data";

/// What the user asked to chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RouteSelection {
    /// The summary over every route.
    #[default]
    All,
    /// A single route, by selection key.
    Route(u32),
}

impl FromStr for RouteSelection {
    type Err = ParseIntError;

    /// Parses `all` (any case) or a route key.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all") {
            Ok(RouteSelection::All)
        } else {
            s.parse().map(RouteSelection::Route)
        }
    }
}

impl fmt::Display for RouteSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteSelection::All => f.write_str("all"),
            RouteSelection::Route(key) => write!(f, "{}", key),
        }
    }
}

/// A series chosen for charting, with its display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    pub label: String,
    pub series: TimeSeries,
}

impl Selection {
    fn no_data() -> Self {
        Self {
            label: NO_DATA_LABEL.to_string(),
            series: TimeSeries::empty(),
        }
    }
}

/// Resolve a selection against a service's routes.
///
/// A route is matched by [`Route::selection_key`], so routes without an
/// assigned key are addressed by position.
pub fn select(routes: &[Route], selection: &RouteSelection) -> Selection {
    match selection {
        RouteSelection::All => Selection {
            label: SUMMARY_LABEL.to_string(),
            series: summarize(routes),
        },
        RouteSelection::Route(key) => routes
            .iter()
            .enumerate()
            .find(|(index, route)| route.selection_key(*index) == *key)
            .and_then(|(index, route)| {
                route.stats.as_ref().map(|stats| Selection {
                    label: route_label(route, index),
                    series: stats.clone(),
                })
            })
            .unwrap_or_else(Selection::no_data),
    }
}

/// Display label for a route at `index` in its service.
///
/// The domain if set, otherwise `TYPE:port` (type defaults to `TCP`),
/// otherwise `Route N` counting from one.
pub fn route_label(route: &Route, index: usize) -> String {
    if let Some(domain) = route.domain.as_deref().filter(|d| !d.is_empty()) {
        return domain.to_string();
    }

    if let Some(port) = route.port.filter(|p| *p != 0) {
        let kind = route
            .kind
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(str::to_uppercase)
            .unwrap_or_else(|| "TCP".to_string());
        return format!("{}:{}", kind, port);
    }

    format!("Route {}", index + 1)
}
