//! PCAP container reading and writing.
//!
//! This module handles the legacy PCAP layout: a 24-byte global header
//! followed by records, each a 16-byte record header plus payload. Records
//! are exposed as borrowed slices so they can be copied verbatim into
//! shard files.

mod header;
mod reader;
mod writer;

pub use header::{GlobalHeader, RecordHeader, GLOBAL_HEADER_LEN, RECORD_HEADER_LEN};
pub use reader::{iterate_packets, read_global_header, PacketIter, RawRecord};
pub use writer::PcapWriter;
