use std::collections::HashMap;

use crate::models::{
    utilization, Device, DeviceStatus, LinkStatus, Tier, TopologyLink, TopologySummary,
};

/// Devices belonging to `tier`, in generation order
pub fn devices_by_tier(devices: &[Device], tier: Tier) -> Vec<&Device> {
    devices.iter().filter(|d| d.tier == tier).collect()
}

/// All links. Returns the full list today; callers go through here so a
/// control-plane / data-plane split can be added without touching them.
pub fn topology_links(links: &[TopologyLink]) -> Vec<&TopologyLink> {
    links.iter().collect()
}

pub fn summarize(devices: &[Device], links: &[TopologyLink]) -> TopologySummary {
    let mut summary = TopologySummary {
        device_count: devices.len(),
        link_count: links.len(),
        ..Default::default()
    };

    let mut tiers: HashMap<&str, Tier> = HashMap::with_capacity(devices.len());
    for d in devices {
        tiers.insert(d.id.as_str(), d.tier);
        *summary.devices_per_tier.entry(d.tier).or_insert(0) += 1;
        match d.status {
            DeviceStatus::Degraded => summary.degraded_devices += 1,
            DeviceStatus::Critical => summary.critical_devices += 1,
            DeviceStatus::Offline => summary.offline_devices += 1,
            DeviceStatus::Healthy => {}
        }
    }

    for l in links {
        let pair = match (tiers.get(l.source.as_str()), tiers.get(l.target.as_str())) {
            (Some(a), Some(b)) => format!("{}-{}", a, b),
            _ => "unknown".to_string(),
        };
        *summary.links_per_tier_pair.entry(pair).or_insert(0) += 1;
        if l.status == LinkStatus::Error {
            summary.error_links += 1;
        }
        if l.utilization >= utilization::WARNING {
            summary.links_over_warning += 1;
        }
        if l.utilization >= utilization::CRITICAL {
            summary.links_over_critical += 1;
        }
        summary.total_bandwidth += u64::from(l.bandwidth);
    }

    summary
}
