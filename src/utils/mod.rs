use std::net::Ipv4Addr;

/// Offset an IPv4 address by `n` hosts, carrying into the higher octets.
/// Wraps at the top of the address space.
pub fn ipv4_add(base: Ipv4Addr, n: usize) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(base).wrapping_add(n as u32))
}

/// Integer ceiling division; zero divisor yields zero
pub fn div_ceil(n: usize, d: usize) -> usize {
    if d == 0 {
        return 0;
    }
    n.div_ceil(d)
}
