//! Positional extraction of IP endpoints from Ethernet frames.
//!
//! Only lengths are validated. Field values are read from their fixed
//! offsets even when they are nonsensical, so a malformed but long enough
//! header still yields endpoints.

use etherparse::{Ethernet2HeaderSlice, IpNumber};

/// Well-known EtherTypes.
pub mod ethertype {
    use etherparse::EtherType;

    pub const IPV4: EtherType = EtherType::IPV4;
    pub const IPV6: EtherType = EtherType::IPV6;
}

/// Transport protocol numbers that carry ports.
pub mod ip_number {
    use etherparse::IpNumber;

    pub const TCP: IpNumber = IpNumber::TCP;
    pub const UDP: IpNumber = IpNumber::UDP;
}

/// Ethernet II header length.
const ETHERNET_HEADER_LEN: usize = 14;

/// Minimum IPv4 header length.
const IPV4_MIN_HEADER_LEN: usize = 20;

/// Fixed IPv6 header length.
const IPV6_HEADER_LEN: usize = 40;

/// Source and destination ports occupy the first 4 bytes of TCP and UDP.
const PORTS_LEN: usize = 4;

/// Addresses, ports and protocol of one IP packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpEndpoints {
    V4 {
        src: [u8; 4],
        dst: [u8; 4],
        src_port: u16,
        dst_port: u16,
        protocol: u8,
    },
    V6 {
        src: [u8; 16],
        dst: [u8; 16],
        src_port: u16,
        dst_port: u16,
        protocol: u8,
    },
}

impl IpEndpoints {
    /// Extract endpoints from an Ethernet frame.
    ///
    /// Returns `None` when the frame is not IPv4/IPv6, is too short for
    /// the IP header, or is TCP/UDP without both ports.
    pub fn from_ethernet(frame: &[u8]) -> Option<Self> {
        let eth = Ethernet2HeaderSlice::from_slice(frame).ok()?;
        let ip = &frame[ETHERNET_HEADER_LEN..];

        let ether_type = eth.ether_type();
        if ether_type == ethertype::IPV4 {
            Self::ipv4(ip)
        } else if ether_type == ethertype::IPV6 {
            Self::ipv6(ip)
        } else {
            None
        }
    }

    fn ipv4(ip: &[u8]) -> Option<Self> {
        if ip.len() < IPV4_MIN_HEADER_LEN || ip[0] >> 4 != 4 {
            return None;
        }

        let header_len = usize::from(ip[0] & 0x0f) * 4;
        if ip.len() < header_len {
            return None;
        }

        let protocol = ip[9];
        let (src_port, dst_port) = ports(IpNumber(protocol), &ip[header_len..])?;

        Some(IpEndpoints::V4 {
            src: ip[12..16].try_into().ok()?,
            dst: ip[16..20].try_into().ok()?,
            src_port,
            dst_port,
            protocol,
        })
    }

    fn ipv6(ip: &[u8]) -> Option<Self> {
        if ip.len() < IPV6_HEADER_LEN || ip[0] >> 4 != 6 {
            return None;
        }

        let protocol = ip[6];
        let (src_port, dst_port) = ports(IpNumber(protocol), &ip[IPV6_HEADER_LEN..])?;

        Some(IpEndpoints::V6 {
            src: ip[8..24].try_into().ok()?,
            dst: ip[24..40].try_into().ok()?,
            src_port,
            dst_port,
            protocol,
        })
    }

    /// IP version, 4 or 6.
    pub fn version(&self) -> u8 {
        match self {
            IpEndpoints::V4 { .. } => 4,
            IpEndpoints::V6 { .. } => 6,
        }
    }
}

/// Read ports for TCP/UDP; other protocols have both set to 0.
///
/// Returns `None` for TCP/UDP with fewer than 4 transport bytes.
fn ports(protocol: IpNumber, transport: &[u8]) -> Option<(u16, u16)> {
    if protocol != ip_number::TCP && protocol != ip_number::UDP {
        return Some((0, 0));
    }
    let p = transport.get(..PORTS_LEN)?;
    Some((
        u16::from_be_bytes([p[0], p[1]]),
        u16::from_be_bytes([p[2], p[3]]),
    ))
}
