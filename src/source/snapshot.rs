//! Wire types for service snapshots.
//!
//! These mirror the JSON the warptail backend serves for its dashboard:
//! a service carries its routes, each route an optional time series of
//! byte counters. They are kept separate from the domain types so that
//! timestamps and counters can be validated once, at ingestion.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use warptail_types::{parse_timestamp, timestamp_from_millis, MalformedSampleError, ProxyStats};

/// Every service in a snapshot, in document order.
pub type ServiceSnapshot = Vec<SerializedService>;

/// A snapshot document: either one service object or an array of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SnapshotDocument {
    Many(Vec<SerializedService>),
    One(SerializedService),
}

impl SnapshotDocument {
    /// Flatten into a list of services.
    pub fn into_services(self) -> ServiceSnapshot {
        match self {
            SnapshotDocument::Many(services) => services,
            SnapshotDocument::One(service) => vec![service],
        }
    }
}

/// A service and its routes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializedService {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub name: String,

    pub enabled: bool,

    #[serde(deserialize_with = "null_as_empty")]
    pub routes: Vec<SerializedRoute>,

    /// Heartbeat latency in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SerializedTimeSeries>,
}

/// A single route within a service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializedRoute {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<u32>,

    /// Route kind: `http`, `https`, `tcp` or `udp`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    /// Lifecycle state as reported, e.g. `Running`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Round-trip latency in nanoseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<SerializedTimeSeries>,
}

/// Sampled byte counters plus the reported cumulative total.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SerializedTimeSeries {
    #[serde(deserialize_with = "null_as_empty")]
    pub points: Vec<SerializedPoint>,
    pub total: ProxyStats,
}

/// One sample.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerializedPoint {
    pub timestamp: SerializedTimestamp,
    #[serde(default)]
    pub value: ProxyStats,
}

/// A sample instant as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SerializedTimestamp {
    /// ISO-8601 / RFC 3339 text.
    Text(String),
    /// Milliseconds since the Unix epoch.
    Millis(i64),
}

impl SerializedTimestamp {
    /// Resolve to a millisecond-precision UTC instant.
    pub fn to_datetime(&self) -> Result<DateTime<Utc>, MalformedSampleError> {
        match self {
            SerializedTimestamp::Text(text) => parse_timestamp(text),
            SerializedTimestamp::Millis(millis) => timestamp_from_millis(*millis),
        }
    }
}

impl fmt::Display for SerializedTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SerializedTimestamp::Text(text) => f.write_str(text),
            SerializedTimestamp::Millis(millis) => write!(f, "{}ms", millis),
        }
    }
}

/// Go encodes a nil slice as `null`.
fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
