use std::collections::HashSet;

use rand::Rng;

use super::devices::{device_id, endpoint_tor, TOR_UPLINKS};
use super::{FabricConfig, FaultPolicy};
use crate::models::{bandwidth, LinkStatus, Tier, TopologyLink};
use crate::utils::div_ceil;

const CORE_SPINE_UTILIZATION: (u8, u8) = (20, 60);
const SPINE_TOR_UTILIZATION: (u8, u8) = (15, 55);
const TOR_ENDPOINT_UTILIZATION: (u8, u8) = (5, 40);

/// Tor-side uplink ports start after the 48 access ports
const TOR_UPLINK_PORT_BASE: usize = 48;
/// Tor-side endpoint ports start after the first 24 ports
const TOR_ENDPOINT_PORT_BASE: usize = 24;

/// One spine -> tor assignment produced by the partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpineTorSlot {
    pub spine: usize,
    pub tor: usize,
    /// Position inside the spine's tor block
    pub offset: usize,
}

/// Number of spine planes the tors are partitioned across
fn plane_count(spine_count: usize) -> usize {
    TOR_UPLINKS.min(spine_count)
}

pub(super) fn in_range(config: &FabricConfig, spine: usize, tor: usize) -> bool {
    (1..=config.spine_count).contains(&spine) && (1..=config.tor_count).contains(&tor)
}

/// Spine -> tor assignments in generation order.
///
/// Spine `s` sits in plane `(s - 1) mod P` with `P = min(4, spine_count)`,
/// and every plane owns a contiguous block of `ceil(tor_count / P)` tors.
/// Indices past `tor_count` are skipped, so the last block may be short.
/// Since `P * ceil(tor_count / P) >= tor_count`, every tor is reached.
pub fn spine_tor_allocation(spine_count: usize, tor_count: usize) -> Vec<SpineTorSlot> {
    let planes = plane_count(spine_count);
    let tors_per_spine = div_ceil(tor_count, planes);
    let mut slots = Vec::new();

    for spine in 1..=spine_count {
        let block_start = ((spine - 1) % planes) * tors_per_spine;
        for offset in 0..tors_per_spine {
            let tor = block_start + offset + 1;
            if tor > tor_count {
                continue;
            }
            slots.push(SpineTorSlot { spine, tor, offset });
        }
    }
    slots
}

/// Assigns sequential link IDs starting at 1
struct LinkSink {
    links: Vec<TopologyLink>,
}

impl LinkSink {
    fn push(
        &mut self,
        (source, source_port): (String, usize),
        (target, target_port): (String, usize),
        bandwidth: u32,
        status: LinkStatus,
        utilization: u8,
    ) {
        let id = self.links.len() as u32 + 1;
        self.links.push(TopologyLink {
            id,
            source,
            target,
            source_port: source_port as u16,
            target_port: target_port as u16,
            status,
            bandwidth,
            utilization,
        });
    }
}

fn jitter<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (u8, u8)) -> u8 {
    rng.gen_range(lo..=hi)
}

/// Build the three link passes in order: core-spine, spine-tor, tor-endpoint
pub(super) fn synthesize<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    rng: &mut R,
) -> Vec<TopologyLink> {
    let mut sink = LinkSink { links: Vec::new() };

    core_spine_pass(config, &mut sink, rng);
    let after_core = sink.links.len();
    spine_tor_pass(config, faults, &mut sink, rng);
    let after_spine = sink.links.len();
    tor_endpoint_pass(config, &mut sink, rng);

    tracing::debug!(
        "Synthesized links: {} core-spine, {} spine-tor, {} tor-endpoint",
        after_core,
        after_spine - after_core,
        sink.links.len() - after_spine
    );
    sink.links
}

/// Full bipartite. Each side's port is the peer's index, so port numbers stay
/// bounded by the opposite tier's size.
fn core_spine_pass<R: Rng + ?Sized>(config: &FabricConfig, sink: &mut LinkSink, rng: &mut R) {
    for core in 1..=config.core_count {
        for spine in 1..=config.spine_count {
            sink.push(
                (device_id(Tier::Core, core), spine),
                (device_id(Tier::Spine, spine), core),
                bandwidth::CORE_SPINE,
                LinkStatus::Active,
                jitter(rng, CORE_SPINE_UTILIZATION),
            );
        }
    }
}

/// Spine downlinks follow the core-facing ports; tor uplinks are numbered by
/// which round of its plane the spine belongs to.
fn spine_tor_pass<R: Rng + ?Sized>(
    config: &FabricConfig,
    faults: &FaultPolicy,
    sink: &mut LinkSink,
    rng: &mut R,
) {
    let planes = plane_count(config.spine_count);
    let mut materialized = HashSet::new();

    for slot in spine_tor_allocation(config.spine_count, config.tor_count) {
        let (status, utilization) = match faults.link_fault(slot.spine, slot.tor) {
            Some(f) => (f.status, f.utilization),
            None => (LinkStatus::Active, jitter(rng, SPINE_TOR_UTILIZATION)),
        };
        materialized.insert((slot.spine, slot.tor));
        sink.push(
            (
                device_id(Tier::Spine, slot.spine),
                config.core_count + slot.offset + 1,
            ),
            (
                device_id(Tier::Tor, slot.tor),
                TOR_UPLINK_PORT_BASE + (slot.spine - 1) / planes + 1,
            ),
            bandwidth::SPINE_TOR,
            status,
            utilization,
        );
    }

    // Seeded faults on pairs the partition did not wire get their own cable,
    // on the first free port of each side.
    let spare_spine_port = config.core_count + div_ceil(config.tor_count, planes) + 1;
    let spare_tor_port = TOR_UPLINK_PORT_BASE + div_ceil(config.spine_count, planes) + 1;
    for fault in &faults.links {
        if !in_range(config, fault.spine, fault.tor)
            || !materialized.insert((fault.spine, fault.tor))
        {
            continue;
        }
        tracing::debug!(
            "Injecting faulted link spine {} -> tor {} ({:?})",
            fault.spine,
            fault.tor,
            fault.status
        );
        sink.push(
            (device_id(Tier::Spine, fault.spine), spare_spine_port),
            (device_id(Tier::Tor, fault.tor), spare_tor_port),
            bandwidth::SPINE_TOR,
            fault.status,
            fault.utilization,
        );
    }
}

/// One link per endpoint, to the tor chosen during device synthesis
fn tor_endpoint_pass<R: Rng + ?Sized>(config: &FabricConfig, sink: &mut LinkSink, rng: &mut R) {
    for endpoint in 1..=config.endpoint_count {
        let Some(tor) = endpoint_tor(endpoint, config.tor_count) else {
            continue;
        };
        sink.push(
            (
                device_id(Tier::Tor, tor),
                TOR_ENDPOINT_PORT_BASE + div_ceil(endpoint, config.tor_count),
            ),
            (device_id(Tier::Endpoint, endpoint), 1),
            bandwidth::TOR_ENDPOINT,
            LinkStatus::Active,
            jitter(rng, TOR_ENDPOINT_UTILIZATION),
        );
    }
}
