//! Network address formatting.

use std::net::Ipv4Addr;

/// Placeholder written for the address of a packet that is not IP.
pub const UNSET_ADDRESS: &str = "-";

/// Format 4 bytes as an IPv4 address string in dotted-decimal notation.
///
/// # Example
///
/// ```
/// use zeekshard::format::format_ipv4;
///
/// assert_eq!(format_ipv4([192, 168, 1, 1]), "192.168.1.1");
/// assert_eq!(format_ipv4([10, 0, 0, 1]), "10.0.0.1");
/// ```
pub fn format_ipv4(octets: [u8; 4]) -> String {
    Ipv4Addr::from(octets).to_string()
}

/// Format 16 bytes as an IPv6 address string.
///
/// Every group is written as four lowercase hex digits; runs of zero
/// groups are not compressed.
///
/// # Example
///
/// ```
/// use zeekshard::format::format_ipv6;
///
/// let bytes = [0x20, 0x01, 0x0d, 0xb8, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1];
/// assert_eq!(format_ipv6(bytes), "2001:0db8:0000:0000:0000:0000:0000:0001");
/// ```
pub fn format_ipv6(octets: [u8; 16]) -> String {
    octets
        .chunks_exact(2)
        .map(|group| format!("{:04x}", u16::from_be_bytes([group[0], group[1]])))
        .collect::<Vec<_>>()
        .join(":")
}
