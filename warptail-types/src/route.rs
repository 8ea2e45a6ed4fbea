//! Routes and services as seen by the dashboard.

use crate::TimeSeries;

/// Lifecycle state reported for a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RouteStatus {
    Starting,
    Running,
    Stopping,
    Stopped,
}

impl RouteStatus {
    /// Returns a short label for display.
    pub fn label(&self) -> &'static str {
        match self {
            RouteStatus::Starting => "Starting",
            RouteStatus::Running => "Running",
            RouteStatus::Stopping => "Stopping",
            RouteStatus::Stopped => "Stopped",
        }
    }
}

/// A single proxied route belonging to a service.
///
/// Only the fields needed for labelling, selection and traffic display
/// are modelled.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Route {
    /// Selection key assigned by the dashboard.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub key: Option<u32>,

    /// Route kind, e.g. `http`, `tcp` or `udp`.
    #[cfg_attr(feature = "serde", serde(rename = "type", skip_serializing_if = "Option::is_none"))]
    pub kind: Option<String>,

    /// Public domain for HTTP routes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub domain: Option<String>,

    /// Listening port for TCP/UDP routes.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub port: Option<u16>,

    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub status: Option<RouteStatus>,

    /// Last measured round-trip latency in nanoseconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub latency: Option<f64>,

    /// Traffic statistics, absent for routes that never reported.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stats: Option<TimeSeries>,
}

impl Route {
    /// Check if the route carries at least one traffic sample.
    pub fn has_samples(&self) -> bool {
        self.stats.as_ref().is_some_and(|s| !s.is_empty())
    }

    /// The key used for selection: the assigned key, or the position.
    pub fn selection_key(&self, index: usize) -> u32 {
        self.key.unwrap_or(index as u32)
    }
}

/// A named group of routes.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Service {
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub id: Option<String>,

    pub name: String,

    pub enabled: bool,

    pub routes: Vec<Route>,

    /// Latency across the service's routes in nanoseconds.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub latency: Option<f64>,

    /// Service-level traffic as reported by the backend.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub stats: Option<TimeSeries>,
}

impl Service {
    /// Create an enabled service with no routes.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            ..Default::default()
        }
    }

    /// Add a route.
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Number of routes that carry traffic samples.
    pub fn routes_with_samples(&self) -> usize {
        self.routes.iter().filter(|r| r.has_samples()).count()
    }
}
