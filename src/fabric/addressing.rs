//! Address and ASN numbering for every tier.
//!
//! All indices are 1-based, matching device IDs. Formulas go through
//! [`ipv4_add`] so large tiers carry into the next octet instead of
//! overflowing.

use std::net::Ipv4Addr;

use crate::utils::{div_ceil, ipv4_add};

pub const MGMT_NODE_IP: Ipv4Addr = Ipv4Addr::new(192, 168, 100, 1);

const CORE_MGMT_BASE: Ipv4Addr = Ipv4Addr::new(192, 168, 100, 10);
const SPINE_MGMT_BASE: Ipv4Addr = Ipv4Addr::new(192, 168, 101, 10);
const TOR_MGMT_BASE: Ipv4Addr = Ipv4Addr::new(192, 168, 102, 10);
const ENDPOINT_MGMT_BASE: Ipv4Addr = Ipv4Addr::new(192, 168, 103, 10);

const CORE_DATA_BASE: Ipv4Addr = Ipv4Addr::new(10, 255, 1, 0);
const SPINE_DATA_BASE: Ipv4Addr = Ipv4Addr::new(10, 255, 2, 0);
const TOR_DATA_BASE: Ipv4Addr = Ipv4Addr::new(10, 255, 3, 0);
const ENDPOINT_DATA_BASE: Ipv4Addr = Ipv4Addr::new(10, 2, 0, 0);

/// Core <-> spine point-to-point space
const CORE_SPINE_P2P_BASE: Ipv4Addr = Ipv4Addr::new(10, 0, 0, 0);
/// Spine <-> tor point-to-point space
const SPINE_TOR_P2P_BASE: Ipv4Addr = Ipv4Addr::new(10, 1, 0, 0);

pub const CORE_ASN_BASE: u32 = 65100;
pub const SPINE_ASN_BASE: u32 = 65110;
pub const TOR_ASN_BASE: u32 = 65130;

pub fn core_mgmt_ip(i: usize) -> Ipv4Addr {
    ipv4_add(CORE_MGMT_BASE, i - 1)
}

pub fn spine_mgmt_ip(i: usize) -> Ipv4Addr {
    ipv4_add(SPINE_MGMT_BASE, i - 1)
}

pub fn tor_mgmt_ip(i: usize) -> Ipv4Addr {
    ipv4_add(TOR_MGMT_BASE, i - 1)
}

pub fn endpoint_mgmt_ip(i: usize) -> Ipv4Addr {
    ipv4_add(ENDPOINT_MGMT_BASE, i - 1)
}

pub fn core_data_ip(i: usize) -> Ipv4Addr {
    ipv4_add(CORE_DATA_BASE, i)
}

pub fn spine_data_ip(i: usize) -> Ipv4Addr {
    ipv4_add(SPINE_DATA_BASE, i)
}

pub fn tor_data_ip(i: usize) -> Ipv4Addr {
    ipv4_add(TOR_DATA_BASE, i)
}

/// Endpoints are numbered in pairs per /24: odd indices take .10, even .11
pub fn endpoint_data_ip(i: usize) -> Ipv4Addr {
    let subnet = div_ceil(i, 2);
    let host = if i % 2 == 1 { 10 } else { 11 };
    ipv4_add(ENDPOINT_DATA_BASE, subnet * 256 + host)
}

pub fn core_asn(i: usize) -> u32 {
    CORE_ASN_BASE + (i as u32 - 1)
}

pub fn spine_asn(i: usize) -> u32 {
    SPINE_ASN_BASE + (i as u32 - 1)
}

pub fn tor_asn(i: usize) -> u32 {
    TOR_ASN_BASE + (i as u32 - 1)
}

/// Addresses of one core <-> spine session, returned as
/// `(core_side, spine_side)`. Each core owns a `2 * spine_count` block so
/// no two cores overlap; within it spine `s` gets the pair ending at `2s`.
pub fn core_spine_pair(core: usize, spine: usize, spine_count: usize) -> (Ipv4Addr, Ipv4Addr) {
    let spine_side = (core - 1) * spine_count * 2 + spine * 2;
    (
        ipv4_add(CORE_SPINE_P2P_BASE, spine_side - 1),
        ipv4_add(CORE_SPINE_P2P_BASE, spine_side),
    )
}

/// Addresses of one spine <-> tor session, returned as `(spine_side, tor_side)`.
pub fn spine_tor_pair(spine: usize, tor: usize, tor_count: usize) -> (Ipv4Addr, Ipv4Addr) {
    let spine_side = ((spine - 1) * tor_count + (tor - 1)) * 2;
    (
        ipv4_add(SPINE_TOR_P2P_BASE, spine_side),
        ipv4_add(SPINE_TOR_P2P_BASE, spine_side + 1),
    )
}
