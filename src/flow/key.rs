//! Flow keys and their display tuples.

use std::fmt;

use super::endpoints::IpEndpoints;
use crate::format::{format_ipv4, format_ipv6, UNSET_ADDRESS};

/// Number of leading packet bytes used as the key of a non-IP packet.
pub const FALLBACK_KEY_BYTES: usize = 64;

const TAG_IPV4: u8 = b'4';
const TAG_IPV6: u8 = b'6';
const TAG_FALLBACK: u8 = b'X';

/// Opaque byte string identifying one flow direction.
///
/// Layout for IP packets: tag, source address, destination address,
/// source port (big-endian), destination port (big-endian), protocol.
/// Other packets: tag followed by at most the first 64 packet bytes.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowKey(Vec<u8>);

impl FlowKey {
    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Check if this key was built from raw packet bytes.
    pub fn is_fallback(&self) -> bool {
        self.0.first() == Some(&TAG_FALLBACK)
    }

    fn from_endpoints(ep: &IpEndpoints) -> Self {
        let mut key = Vec::with_capacity(1 + 32 + 5);
        match ep {
            IpEndpoints::V4 { src, dst, .. } => {
                key.push(TAG_IPV4);
                key.extend_from_slice(src);
                key.extend_from_slice(dst);
            }
            IpEndpoints::V6 { src, dst, .. } => {
                key.push(TAG_IPV6);
                key.extend_from_slice(src);
                key.extend_from_slice(dst);
            }
        }
        let (src_port, dst_port, protocol) = ports_and_protocol(ep);
        key.extend_from_slice(&src_port.to_be_bytes());
        key.extend_from_slice(&dst_port.to_be_bytes());
        key.push(protocol);
        FlowKey(key)
    }

    fn fallback(packet: &[u8]) -> Self {
        let take = packet.len().min(FALLBACK_KEY_BYTES);
        let mut key = Vec::with_capacity(1 + take);
        key.push(TAG_FALLBACK);
        key.extend_from_slice(&packet[..take]);
        FlowKey(key)
    }
}

impl fmt::Debug for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FlowKey(")?;
        for b in &self.0 {
            write!(f, "{b:02x}")?;
        }
        write!(f, ")")
    }
}

/// Human-readable form of a flow key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowTuple {
    /// 4, 6, or 0 for non-IP packets.
    pub ip_version: u8,
    pub src_ip: String,
    pub dst_ip: String,
    pub src_port: u16,
    pub dst_port: u16,
    /// IP protocol number (6 = TCP, 17 = UDP).
    pub protocol: u8,
}

impl FlowTuple {
    /// Placeholder tuple for non-IP packets.
    pub fn unset() -> Self {
        Self {
            ip_version: 0,
            src_ip: UNSET_ADDRESS.to_string(),
            dst_ip: UNSET_ADDRESS.to_string(),
            src_port: 0,
            dst_port: 0,
            protocol: 0,
        }
    }

    fn from_endpoints(ep: &IpEndpoints) -> Self {
        let (src_ip, dst_ip) = match ep {
            IpEndpoints::V4 { src, dst, .. } => (format_ipv4(*src), format_ipv4(*dst)),
            IpEndpoints::V6 { src, dst, .. } => (format_ipv6(*src), format_ipv6(*dst)),
        };
        let (src_port, dst_port, protocol) = ports_and_protocol(ep);
        Self {
            ip_version: ep.version(),
            src_ip,
            dst_ip,
            src_port,
            dst_port,
            protocol,
        }
    }
}

fn ports_and_protocol(ep: &IpEndpoints) -> (u16, u16, u8) {
    match *ep {
        IpEndpoints::V4 { src_port, dst_port, protocol, .. }
        | IpEndpoints::V6 { src_port, dst_port, protocol, .. } => (src_port, dst_port, protocol),
    }
}

/// Derive the flow key and display tuple of one Ethernet frame.
///
/// Never fails: frames that are not IPv4/IPv6, too short to hold the IP
/// header, or TCP/UDP without both ports fall back to a key built from
/// their leading bytes.
pub fn classify(packet: &[u8]) -> (FlowKey, FlowTuple) {
    match IpEndpoints::from_ethernet(packet) {
        Some(ep) => (FlowKey::from_endpoints(&ep), FlowTuple::from_endpoints(&ep)),
        None => (FlowKey::fallback(packet), FlowTuple::unset()),
    }
}
