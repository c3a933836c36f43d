//! Global and per-record PCAP headers.

/// Size of the PCAP global header in bytes.
pub const GLOBAL_HEADER_LEN: usize = 24;

/// Size of a PCAP record header in bytes.
pub const RECORD_HEADER_LEN: usize = 16;

/// Decoded PCAP global header.
///
/// The raw bytes are kept alongside the decoded fields so the header can be
/// reproduced byte-for-byte in every shard file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobalHeader {
    /// Raw header bytes as found in the capture.
    pub raw: [u8; GLOBAL_HEADER_LEN],

    /// Magic number (decoded in the file's byte order).
    pub magic: u32,

    /// Major version.
    pub version_major: u16,

    /// Minor version.
    pub version_minor: u16,

    /// GMT to local correction.
    pub thiszone: i32,

    /// Accuracy of timestamps.
    pub sigfigs: u32,

    /// Snapshot length.
    pub snaplen: u32,

    /// Link layer type (e.g., 1 = Ethernet).
    pub link_type: u32,
}

impl GlobalHeader {
    /// Decode a global header from exactly [`GLOBAL_HEADER_LEN`] bytes.
    ///
    /// No magic validation is performed; an unknown magic is decoded as
    /// little-endian.
    pub fn from_bytes(raw: [u8; GLOBAL_HEADER_LEN]) -> Self {
        let big_endian = matches!(&raw[0..4], [0xa1, 0xb2, 0xc3, 0xd4] | [0xa1, 0xb2, 0x3c, 0x4d]);

        let u16_at = |off: usize| {
            let b = [raw[off], raw[off + 1]];
            if big_endian {
                u16::from_be_bytes(b)
            } else {
                u16::from_le_bytes(b)
            }
        };
        let u32_at = |off: usize| {
            let b = [raw[off], raw[off + 1], raw[off + 2], raw[off + 3]];
            if big_endian {
                u32::from_be_bytes(b)
            } else {
                u32::from_le_bytes(b)
            }
        };

        Self {
            raw,
            magic: u32_at(0),
            version_major: u16_at(4),
            version_minor: u16_at(6),
            thiszone: u32_at(8) as i32,
            sigfigs: u32_at(12),
            snaplen: u32_at(16),
            link_type: u32_at(20),
        }
    }

    /// Check if timestamps carry nanoseconds rather than microseconds.
    pub fn is_nanosecond(&self) -> bool {
        self.magic == 0xa1b2_3c4d
    }
}

/// PCAP record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Timestamp seconds.
    pub ts_sec: u32,

    /// Timestamp fraction (micro- or nanoseconds).
    pub ts_frac: u32,

    /// Number of payload bytes stored in the file.
    pub captured_len: u32,

    /// Length of the packet on the wire.
    pub original_len: u32,
}

impl RecordHeader {
    /// Decode a record header. All fields are read little-endian.
    pub fn from_bytes(raw: &[u8; RECORD_HEADER_LEN]) -> Self {
        let u32_at = |off: usize| u32::from_le_bytes([raw[off], raw[off + 1], raw[off + 2], raw[off + 3]]);
        Self {
            ts_sec: u32_at(0),
            ts_frac: u32_at(4),
            captured_len: u32_at(8),
            original_len: u32_at(12),
        }
    }

    /// Check if the packet was truncated during capture.
    pub fn is_truncated(&self) -> bool {
        self.captured_len < self.original_len
    }
}
