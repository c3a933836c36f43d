//! Flow key extraction.
//!
//! Every packet is reduced to a [`FlowKey`], the byte string the sharder
//! hashes, and a [`FlowTuple`], its human-readable form for the shard map.
//!
//! Keys are directional: source and destination are taken in packet order,
//! so the two directions of a conversation produce different keys.

mod endpoints;
mod key;

pub use endpoints::{ethertype, ip_number, IpEndpoints};
pub use key::{classify, FlowKey, FlowTuple, FALLBACK_KEY_BYTES};
