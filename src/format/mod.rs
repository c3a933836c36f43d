//! Value formatting utilities for network addresses.
//!
//! Provides formatting functions for the human-readable side of a flow key:
//! - IPv4 addresses (4 bytes -> dotted-decimal string)
//! - IPv6 addresses (16 bytes -> eight zero-padded hex groups)

mod address;

pub use address::{format_ipv4, format_ipv6, UNSET_ADDRESS};
