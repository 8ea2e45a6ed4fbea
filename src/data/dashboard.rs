//! Validated dashboard data built from service snapshots.

use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use warptail_types::{
    MalformedSampleError, ProxyStats, Route, RouteStatus, Service, TimeSeries, TimeSeriesPoint,
};

use super::select::route_label;
use crate::source::{
    SerializedRoute, SerializedService, SerializedTimeSeries, ServiceSnapshot, SnapshotDocument,
};

/// What to do with a sample whose timestamp or counters are unusable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SamplePolicy {
    /// Skip the sample and log a warning.
    #[default]
    Drop,
    /// Fail the whole snapshot.
    Reject,
}

impl FromStr for SamplePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drop" => Ok(SamplePolicy::Drop),
            "reject" => Ok(SamplePolicy::Reject),
            other => Err(format!("unknown sample policy {:?} (expected drop or reject)", other)),
        }
    }
}

impl fmt::Display for SamplePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SamplePolicy::Drop => "drop",
            SamplePolicy::Reject => "reject",
        })
    }
}

/// Services with every sample resolved to a valid instant.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub services: Vec<Service>,
    pub last_updated: Instant,
}

impl DashboardData {
    /// Load and validate a snapshot file.
    pub fn load(path: &Path, policy: SamplePolicy) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::parse(&content, policy)
    }

    /// Parse and validate a snapshot document.
    pub fn parse(content: &str, policy: SamplePolicy) -> Result<Self> {
        let document: SnapshotDocument =
            serde_json::from_str(content).context("Failed to parse service snapshot")?;
        Ok(Self::from_snapshot(document.into_services(), policy)?)
    }

    /// Convert a snapshot into validated domain data.
    ///
    /// Under [`SamplePolicy::Reject`] the first malformed sample fails the
    /// whole conversion.
    pub fn from_snapshot(
        snapshot: ServiceSnapshot,
        policy: SamplePolicy,
    ) -> Result<Self, MalformedSampleError> {
        let services = snapshot
            .into_iter()
            .map(|service| convert_service(service, policy))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(services = services.len(), "Converted snapshot");

        Ok(Self {
            services,
            last_updated: Instant::now(),
        })
    }

    /// Find a service by name, or the first service when no name is given.
    pub fn service(&self, name: Option<&str>) -> Option<&Service> {
        match name {
            Some(name) => self.services.iter().find(|s| s.name == name),
            None => self.services.first(),
        }
    }
}

fn convert_service(
    service: SerializedService,
    policy: SamplePolicy,
) -> Result<Service, MalformedSampleError> {
    let routes = service
        .routes
        .into_iter()
        .enumerate()
        .map(|(index, route)| convert_route(route, index, &service.name, policy))
        .collect::<Result<Vec<_>, _>>()?;

    let stats = service
        .stats
        .map(|stats| convert_series(stats, &service.name, policy))
        .transpose()?;

    Ok(Service {
        id: service.id,
        name: service.name,
        enabled: service.enabled,
        routes,
        latency: service.latency,
        stats,
    })
}

fn convert_route(
    route: SerializedRoute,
    index: usize,
    service: &str,
    policy: SamplePolicy,
) -> Result<Route, MalformedSampleError> {
    let mut converted = Route {
        key: route.key,
        kind: route.kind,
        domain: route.domain,
        port: route.port,
        status: route.status.as_deref().and_then(parse_status),
        latency: route.latency,
        stats: None,
    };

    if let Some(stats) = route.stats {
        let context = format!("{}/{}", service, route_label(&converted, index));
        converted.stats = Some(convert_series(stats, &context, policy)?);
    }

    Ok(converted)
}

fn convert_series(
    series: SerializedTimeSeries,
    context: &str,
    policy: SamplePolicy,
) -> Result<TimeSeries, MalformedSampleError> {
    let mut points = Vec::with_capacity(series.points.len());

    for point in series.points {
        let checked = point.timestamp.to_datetime().and_then(|timestamp| {
            if point.value.is_valid() {
                Ok(TimeSeriesPoint::new(timestamp, point.value))
            } else {
                Err(invalid_value(point.timestamp.to_string(), point.value))
            }
        });

        match checked {
            Ok(point) => points.push(point),
            Err(e) => handle_malformed(e, context, policy)?,
        }
    }

    let total = if series.total.is_valid() {
        series.total
    } else {
        handle_malformed(invalid_value("total".to_string(), series.total), context, policy)?;
        ProxyStats::ZERO
    };

    Ok(TimeSeries::new(points, total))
}

fn invalid_value(timestamp: String, value: ProxyStats) -> MalformedSampleError {
    MalformedSampleError::InvalidValue {
        timestamp,
        sent: value.sent,
        received: value.received,
    }
}

fn handle_malformed(
    error: MalformedSampleError,
    context: &str,
    policy: SamplePolicy,
) -> Result<(), MalformedSampleError> {
    match policy {
        SamplePolicy::Drop => {
            warn!(route = context, error = %error, "Dropping malformed sample");
            Ok(())
        }
        SamplePolicy::Reject => Err(error),
    }
}

fn parse_status(status: &str) -> Option<RouteStatus> {
    match status.to_ascii_lowercase().as_str() {
        "starting" => Some(RouteStatus::Starting),
        "running" => Some(RouteStatus::Running),
        "stopping" => Some(RouteStatus::Stopping),
        "stopped" => Some(RouteStatus::Stopped),
        "" => None,
        other => {
            debug!(status = other, "Unknown route status");
            None
        }
    }
}
