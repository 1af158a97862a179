pub mod topology;

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

pub use topology::*;

/// Hardware class of a device. The management node is modelled as a `core`
/// class device living in the `management` tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Core,
    Spine,
    Tor,
    Endpoint,
}

/// Horizontal layer of the fabric
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Management,
    Core,
    Spine,
    Tor,
    Endpoint,
}

impl Tier {
    pub const ALL: [Tier; 5] = [
        Tier::Management,
        Tier::Core,
        Tier::Spine,
        Tier::Tor,
        Tier::Endpoint,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Management => "management",
            Tier::Core => "core",
            Tier::Spine => "spine",
            Tier::Tor => "tor",
            Tier::Endpoint => "endpoint",
        }
    }

    /// Tiers whose devices run BGP
    pub fn is_fabric(&self) -> bool {
        matches!(self, Tier::Core | Tier::Spine | Tier::Tor)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Management,
    Fabric,
    Transit,
    Endpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    #[default]
    Healthy,
    Degraded,
    Critical,
    Offline,
}

/// One side of a BGP session, as configured on the owning device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpNeighbor {
    pub peer_ip: Ipv4Addr,
    pub peer_asn: u32,
    pub weight: u32,
    pub keepalive_secs: u32,
    pub hold_secs: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BgpConfig {
    pub asn: u32,
    pub router_id: Ipv4Addr,
    pub neighbors: Vec<BgpNeighbor>,
}

/// Metrics exporter descriptor scraped by the monitoring stack
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryExporter {
    pub enabled: bool,
    pub port: u16,
    pub interval_secs: u32,
    pub path: String,
}

impl Default for TelemetryExporter {
    fn default() -> Self {
        Self {
            enabled: true,
            port: 9100,
            interval_secs: 15,
            path: "/metrics".to_string(),
        }
    }
}

/// Device represents one network element of a generated fabric
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Device {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub device_type: DeviceType,
    pub tier: Tier,
    pub role: Role,
    pub status: DeviceStatus,
    pub mgmt_ip: Ipv4Addr,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_ip: Option<Ipv4Addr>,
    pub cpu: u8,
    pub memory: u8,
    pub uptime_secs: u64,
    pub port_count: u16,
    pub ports_up: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bgp: Option<BgpConfig>,
    pub telemetry: TelemetryExporter,
    /// Top-of-rack switch an endpoint hangs off
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tor_id: Option<String>,
}

impl Device {
    pub fn bgp_peer_count(&self) -> usize {
        self.bgp.as_ref().map(|b| b.neighbors.len()).unwrap_or(0)
    }

    pub fn is_fabric(&self) -> bool {
        self.tier.is_fabric()
    }
}
