use rand::Rng;

use super::addressing::*;
use super::{FabricConfig, FaultPolicy};
use crate::models::{
    BgpConfig, BgpNeighbor, Device, DeviceStatus, DeviceType, Role, TelemetryExporter, Tier,
};

/// Maximum number of spine uplinks per top-of-rack switch
pub const TOR_UPLINKS: usize = 4;

pub const DEFAULT_WEIGHT: u32 = 100;
pub const PREFERRED_WEIGHT: u32 = 200;
pub const KEEPALIVE_SECS: u32 = 3;
pub const HOLD_SECS: u32 = 9;

/// Jitter bounds for one tier's operational metrics
struct Profile {
    cpu: (u8, u8),
    memory: (u8, u8),
    port_count: u16,
}

const MGMT_PROFILE: Profile = Profile { cpu: (5, 20), memory: (20, 40), port_count: 8 };
const CORE_PROFILE: Profile = Profile { cpu: (20, 45), memory: (30, 60), port_count: 64 };
const SPINE_PROFILE: Profile = Profile { cpu: (15, 40), memory: (25, 55), port_count: 48 };
const TOR_PROFILE: Profile = Profile { cpu: (10, 35), memory: (20, 50), port_count: 52 };
const ENDPOINT_PROFILE: Profile = Profile { cpu: (5, 70), memory: (10, 80), port_count: 2 };

const MIN_UPTIME_SECS: u64 = 86_400;
const MAX_UPTIME_SECS: u64 = 90 * 86_400;

struct Operational {
    cpu: u8,
    memory: u8,
    uptime_secs: u64,
    port_count: u16,
    ports_up: u16,
}

impl Profile {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Operational {
        Operational {
            cpu: rng.gen_range(self.cpu.0..=self.cpu.1),
            memory: rng.gen_range(self.memory.0..=self.memory.1),
            uptime_secs: rng.gen_range(MIN_UPTIME_SECS..=MAX_UPTIME_SECS),
            port_count: self.port_count,
            ports_up: rng.gen_range(self.port_count / 2..=self.port_count),
        }
    }
}

/// Stable device ID for a tier and 1-based index.
/// Core and spine IDs are padded to two digits, tor and endpoint IDs to three.
pub fn device_id(tier: Tier, index: usize) -> String {
    match tier {
        Tier::Management => format!("mgmt-{:02}", index),
        Tier::Core => format!("core-{:02}", index),
        Tier::Spine => format!("spine-{:02}", index),
        Tier::Tor => format!("tor-{:03}", index),
        Tier::Endpoint => format!("ep-{:03}", index),
    }
}

fn neighbor(peer_ip: std::net::Ipv4Addr, peer_asn: u32, weight: u32) -> BgpNeighbor {
    BgpNeighbor {
        peer_ip,
        peer_asn,
        weight,
        keepalive_secs: KEEPALIVE_SECS,
        hold_secs: HOLD_SECS,
    }
}

fn status(faults: &FaultPolicy, tier: Tier, index: usize) -> DeviceStatus {
    faults.device_status(tier, index).unwrap_or_default()
}

/// Build every device tier in order: management, core, spine, tor, endpoint
pub(super) fn synthesize<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    rng: &mut R,
) -> Vec<Device> {
    let mut devices = Vec::with_capacity(config.device_count());

    devices.push(management_node(faults, rng));
    devices.extend((1..=config.core_count).map(|i| core_device(config, faults, i, rng)));
    devices.extend((1..=config.spine_count).map(|i| spine_device(config, faults, i, rng)));
    devices.extend((1..=config.tor_count).map(|i| tor_device(config, faults, i, rng)));
    devices.extend((1..=config.endpoint_count).map(|i| endpoint_device(config, faults, i, rng)));

    tracing::debug!(
        "Synthesized {} devices ({} with BGP)",
        devices.len(),
        devices.iter().filter(|d| d.bgp.is_some()).count()
    );
    devices
}

fn management_node<R: Rng + ?Sized>(faults: &FaultPolicy, rng: &mut R) -> Device {
    let op = MGMT_PROFILE.sample(rng);
    Device {
        id: device_id(Tier::Management, 1),
        name: "Management Node".to_string(),
        device_type: DeviceType::Core,
        tier: Tier::Management,
        role: Role::Management,
        status: status(faults, Tier::Management, 1),
        mgmt_ip: MGMT_NODE_IP,
        data_ip: None,
        cpu: op.cpu,
        memory: op.memory,
        uptime_secs: op.uptime_secs,
        port_count: op.port_count,
        ports_up: op.ports_up,
        bgp: None,
        telemetry: TelemetryExporter::default(),
        tor_id: None,
    }
}

/// Core `i` peers with every spine
fn core_device<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    i: usize,
    rng: &mut R,
) -> Device {
    let op = CORE_PROFILE.sample(rng);
    let data_ip = core_data_ip(i);
    let neighbors = (1..=config.spine_count)
        .map(|s| {
            let (_, spine_side) = core_spine_pair(i, s, config.spine_count);
            neighbor(spine_side, spine_asn(s), DEFAULT_WEIGHT)
        })
        .collect();

    Device {
        id: device_id(Tier::Core, i),
        name: format!("Core Switch {}", i),
        device_type: DeviceType::Core,
        tier: Tier::Core,
        role: Role::Transit,
        status: status(faults, Tier::Core, i),
        mgmt_ip: core_mgmt_ip(i),
        data_ip: Some(data_ip),
        cpu: op.cpu,
        memory: op.memory,
        uptime_secs: op.uptime_secs,
        port_count: op.port_count,
        ports_up: op.ports_up,
        bgp: Some(BgpConfig {
            asn: core_asn(i),
            router_id: data_ip,
            neighbors,
        }),
        telemetry: TelemetryExporter::default(),
        tor_id: None,
    }
}

/// Spine `i` peers with every core, from the other end of the same pairs
fn spine_device<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    i: usize,
    rng: &mut R,
) -> Device {
    let op = SPINE_PROFILE.sample(rng);
    let data_ip = spine_data_ip(i);
    let neighbors = (1..=config.core_count)
        .map(|c| {
            let (core_side, _) = core_spine_pair(c, i, config.spine_count);
            neighbor(core_side, core_asn(c), DEFAULT_WEIGHT)
        })
        .collect();

    Device {
        id: device_id(Tier::Spine, i),
        name: format!("Spine Switch {}", i),
        device_type: DeviceType::Spine,
        tier: Tier::Spine,
        role: Role::Fabric,
        status: status(faults, Tier::Spine, i),
        mgmt_ip: spine_mgmt_ip(i),
        data_ip: Some(data_ip),
        cpu: op.cpu,
        memory: op.memory,
        uptime_secs: op.uptime_secs,
        port_count: op.port_count,
        ports_up: op.ports_up,
        bgp: Some(BgpConfig {
            asn: spine_asn(i),
            router_id: data_ip,
            neighbors,
        }),
        telemetry: TelemetryExporter::default(),
        tor_id: None,
    }
}

/// Spine indices a tor peers with, in preference order: round-robin from
/// offset `(i - 1) mod spine_count`, at most [`TOR_UPLINKS`] of them.
pub fn tor_uplink_spines(i: usize, spine_count: usize) -> Vec<usize> {
    let uplinks = TOR_UPLINKS.min(spine_count);
    (0..uplinks)
        .map(|k| (i - 1 + k) % spine_count + 1)
        .collect()
}

/// The first uplink is preferred (weight 200); the rest are backups
fn tor_device<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    i: usize,
    rng: &mut R,
) -> Device {
    let op = TOR_PROFILE.sample(rng);
    let data_ip = tor_data_ip(i);
    let neighbors = tor_uplink_spines(i, config.spine_count)
        .into_iter()
        .enumerate()
        .map(|(k, s)| {
            let (spine_side, _) = spine_tor_pair(s, i, config.tor_count);
            let weight = if k == 0 { PREFERRED_WEIGHT } else { DEFAULT_WEIGHT };
            neighbor(spine_side, spine_asn(s), weight)
        })
        .collect();

    Device {
        id: device_id(Tier::Tor, i),
        name: format!("ToR Switch {}", i),
        device_type: DeviceType::Tor,
        tier: Tier::Tor,
        role: Role::Fabric,
        status: status(faults, Tier::Tor, i),
        mgmt_ip: tor_mgmt_ip(i),
        data_ip: Some(data_ip),
        cpu: op.cpu,
        memory: op.memory,
        uptime_secs: op.uptime_secs,
        port_count: op.port_count,
        ports_up: op.ports_up,
        bgp: Some(BgpConfig {
            asn: tor_asn(i),
            router_id: data_ip,
            neighbors,
        }),
        telemetry: TelemetryExporter::default(),
        tor_id: None,
    }
}

/// Tor index endpoint `i` attaches to, or `None` when there are no tors
pub fn endpoint_tor(i: usize, tor_count: usize) -> Option<usize> {
    (tor_count > 0).then(|| (i - 1) % tor_count + 1)
}

fn endpoint_device<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    i: usize,
    rng: &mut R,
) -> Device {
    let op = ENDPOINT_PROFILE.sample(rng);
    Device {
        id: device_id(Tier::Endpoint, i),
        name: format!("Endpoint {}", i),
        device_type: DeviceType::Endpoint,
        tier: Tier::Endpoint,
        role: Role::Endpoint,
        status: status(faults, Tier::Endpoint, i),
        mgmt_ip: endpoint_mgmt_ip(i),
        data_ip: Some(endpoint_data_ip(i)),
        cpu: op.cpu,
        memory: op.memory,
        uptime_secs: op.uptime_secs,
        port_count: op.port_count,
        ports_up: op.ports_up,
        bgp: None,
        telemetry: TelemetryExporter::default(),
        tor_id: endpoint_tor(i, config.tor_count).map(|t| device_id(Tier::Tor, t)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::net::Ipv4Addr;

    fn build(config: FabricConfig) -> Vec<Device> {
        synthesize(&config, &FaultPolicy::default(), &mut StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_device_ids() {
        assert_eq!(device_id(Tier::Management, 1), "mgmt-01");
        assert_eq!(device_id(Tier::Core, 3), "core-03");
        assert_eq!(device_id(Tier::Spine, 12), "spine-12");
        assert_eq!(device_id(Tier::Tor, 5), "tor-005");
        assert_eq!(device_id(Tier::Endpoint, 20), "ep-020");
    }

    #[test]
    fn test_tier_order_and_counts() {
        let devices = build(FabricConfig::default());
        assert_eq!(devices.len(), 53);
        assert_eq!(devices[0].tier, Tier::Management);
        assert_eq!(devices[0].device_type, DeviceType::Core);
        assert_eq!(devices[0].mgmt_ip, Ipv4Addr::new(192, 168, 100, 1));
        assert!(devices[0].bgp.is_none());
        assert!(devices[0].data_ip.is_none());
        assert_eq!(devices[1].id, "core-01");
        assert_eq!(devices[5].id, "spine-01");
        assert_eq!(devices[17].id, "tor-001");
        assert_eq!(devices[33].id, "ep-001");
    }

    #[test]
    fn test_core_neighbors() {
        let devices = build(FabricConfig::default());
        let core2 = devices.iter().find(|d| d.id == "core-02").unwrap();
        let bgp = core2.bgp.as_ref().unwrap();
        assert_eq!(bgp.asn, 65101);
        assert_eq!(bgp.router_id, Ipv4Addr::new(10, 255, 1, 2));
        assert_eq!(bgp.neighbors.len(), 12);
        assert_eq!(bgp.neighbors[0].peer_ip, Ipv4Addr::new(10, 0, 0, 26));
        assert_eq!(bgp.neighbors[0].peer_asn, 65110);
        assert!(bgp.neighbors.iter().all(|n| n.weight == 100));
    }

    #[test]
    fn test_spine_neighbors_mirror_core() {
        let devices = build(FabricConfig::default());
        let spine3 = devices.iter().find(|d| d.id == "spine-03").unwrap();
        let bgp = spine3.bgp.as_ref().unwrap();
        assert_eq!(bgp.neighbors.len(), 4);
        // core 2 sees spine 3 at .30, spine 3 sees core 2 at .29
        assert_eq!(bgp.neighbors[1].peer_ip, Ipv4Addr::new(10, 0, 0, 29));
        assert_eq!(bgp.neighbors[1].peer_asn, 65101);

        let core2 = devices.iter().find(|d| d.id == "core-02").unwrap();
        let core_view = core2.bgp.as_ref().unwrap().neighbors[2].peer_ip;
        assert_eq!(core_view, Ipv4Addr::new(10, 0, 0, 30));
    }

    #[test]
    fn test_tor_uplink_selection() {
        assert_eq!(tor_uplink_spines(1, 12), vec![1, 2, 3, 4]);
        assert_eq!(tor_uplink_spines(11, 12), vec![11, 12, 1, 2]);
        assert_eq!(tor_uplink_spines(5, 2), vec![1, 2]);
        assert!(tor_uplink_spines(1, 0).is_empty());
    }

    #[test]
    fn test_tor_weights() {
        let devices = build(FabricConfig::default());
        let tor = devices.iter().find(|d| d.id == "tor-005").unwrap();
        let bgp = tor.bgp.as_ref().unwrap();
        let weights: Vec<u32> = bgp.neighbors.iter().map(|n| n.weight).collect();
        assert_eq!(weights, vec![200, 100, 100, 100]);
        assert_eq!(bgp.neighbors[0].peer_asn, 65114);
        assert_eq!(tor.status, DeviceStatus::Degraded);
    }

    #[test]
    fn test_endpoint_assignment() {
        assert_eq!(endpoint_tor(1, 16), Some(1));
        assert_eq!(endpoint_tor(17, 16), Some(1));
        assert_eq!(endpoint_tor(20, 16), Some(4));
        assert_eq!(endpoint_tor(3, 0), None);

        let devices = build(FabricConfig::default());
        let ep = devices.iter().find(|d| d.id == "ep-018").unwrap();
        assert_eq!(ep.tor_id.as_deref(), Some("tor-002"));
        assert_eq!(ep.data_ip, Some(Ipv4Addr::new(10, 2, 9, 11)));
        assert!(ep.bgp.is_none());
    }

    #[test]
    fn test_metrics_within_profile() {
        for d in build(FabricConfig::default()) {
            assert!(d.cpu <= 100 && d.memory <= 100);
            assert!(d.ports_up <= d.port_count);
            assert!(d.uptime_secs >= MIN_UPTIME_SECS);
            assert_eq!(d.telemetry, TelemetryExporter::default());
        }
    }
}
