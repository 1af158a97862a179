//! In-place BGP adjustments a remediation workflow applies to a generated
//! inventory.

use std::net::Ipv4Addr;

use super::devices::{DEFAULT_WEIGHT, PREFERRED_WEIGHT};
use crate::error::FabricError;
use crate::models::{BgpConfig, Device};

fn bgp_mut(device: &mut Device) -> Result<&mut BgpConfig, FabricError> {
    let id = device.id.clone();
    device.bgp.as_mut().ok_or(FabricError::NoBgpConfig(id))
}

pub fn set_neighbor_weight(
    device: &mut Device,
    peer_ip: Ipv4Addr,
    weight: u32,
) -> Result<(), FabricError> {
    let id = device.id.clone();
    let neighbor = bgp_mut(device)?
        .neighbors
        .iter_mut()
        .find(|n| n.peer_ip == peer_ip)
        .ok_or(FabricError::NeighborNotFound { device: id, peer: peer_ip })?;
    neighbor.weight = weight;
    tracing::info!("Set BGP weight {} for {} neighbor {}", weight, device.id, peer_ip);
    Ok(())
}

/// Demote the preferred uplink and promote the next neighbor in list order
/// (wrapping). Returns the newly preferred peer.
pub fn prefer_backup_uplink(device: &mut Device) -> Result<Ipv4Addr, FabricError> {
    let id = device.id.clone();
    let bgp = bgp_mut(device)?;
    if bgp.neighbors.len() < 2 {
        return Err(FabricError::NoBackupUplink(id));
    }

    let current = bgp
        .neighbors
        .iter()
        .position(|n| n.weight == PREFERRED_WEIGHT)
        .unwrap_or(0);
    let next = (current + 1) % bgp.neighbors.len();

    bgp.neighbors[current].weight = DEFAULT_WEIGHT;
    bgp.neighbors[next].weight = PREFERRED_WEIGHT;
    let peer = bgp.neighbors[next].peer_ip;

    tracing::info!(
        "Failed {} over from {} to backup uplink {}",
        id,
        bgp.neighbors[current].peer_ip,
        peer
    );
    Ok(peer)
}

/// Apply session timers to every neighbor of the device
pub fn set_bgp_timers(device: &mut Device, keepalive: u32, hold: u32) -> Result<(), FabricError> {
    if keepalive == 0 || hold < keepalive.saturating_mul(3) {
        return Err(FabricError::InvalidTimers { keepalive, hold });
    }
    for n in bgp_mut(device)?.neighbors.iter_mut() {
        n.keepalive_secs = keepalive;
        n.hold_secs = hold;
    }
    Ok(())
}
