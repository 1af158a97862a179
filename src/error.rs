use std::net::Ipv4Addr;

use thiserror::Error;

use crate::models::Tier;

/// Errors raised by validation and by the inventory mutation helpers.
/// Generation itself is infallible.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FabricError {
    #[error("invalid fabric configuration: {tier} tier {reason}")]
    InvalidConfiguration { tier: Tier, reason: String },

    #[error("device {0} has no BGP configuration")]
    NoBgpConfig(String),

    #[error("device {device} has no BGP neighbor {peer}")]
    NeighborNotFound { device: String, peer: Ipv4Addr },

    #[error("device {0} has no backup uplink to fail over to")]
    NoBackupUplink(String),

    #[error("invalid BGP timers: keepalive {keepalive}s, hold {hold}s (hold must be at least 3x keepalive)")]
    InvalidTimers { keepalive: u32, hold: u32 },
}
