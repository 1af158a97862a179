use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Device, Tier};

/// Canonical link bandwidths, shrinking toward the edge
pub mod bandwidth {
    pub const CORE_SPINE: u32 = 100_000;
    pub const SPINE_TOR: u32 = 40_000;
    pub const TOR_ENDPOINT: u32 = 10_000;
}

/// Utilization thresholds used when summarizing a fabric
pub mod utilization {
    pub const WARNING: u8 = 80;
    pub const CRITICAL: u8 = 95;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkStatus {
    #[default]
    Active,
    Error,
}

/// TopologyLink is a directed data-plane connection between two devices
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyLink {
    pub id: u32,
    pub source: String,
    pub target: String,
    pub source_port: u16,
    pub target_port: u16,
    pub status: LinkStatus,
    pub bandwidth: u32,
    pub utilization: u8,
}

/// Output of one generation run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Fabric {
    pub devices: Vec<Device>,
    pub links: Vec<TopologyLink>,
}

impl Fabric {
    pub fn into_parts(self) -> (Vec<Device>, Vec<TopologyLink>) {
        (self.devices, self.links)
    }

    pub fn device(&self, id: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.id == id)
    }
}

/// Aggregate counts over a device inventory and link list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologySummary {
    pub device_count: usize,
    pub devices_per_tier: BTreeMap<Tier, usize>,
    pub link_count: usize,
    /// Keyed by "<source tier>-<target tier>", e.g. "spine-tor"
    pub links_per_tier_pair: BTreeMap<String, usize>,
    pub error_links: usize,
    pub links_over_warning: usize,
    pub links_over_critical: usize,
    pub degraded_devices: usize,
    pub critical_devices: usize,
    pub offline_devices: usize,
    pub total_bandwidth: u64,
}
