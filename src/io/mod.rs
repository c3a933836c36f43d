//! Capture file I/O.
//!
//! Captures are memory-mapped when stored uncompressed and decompressed into
//! memory when gzipped. Either way the sharder sees one contiguous byte slice.
//!
//! ## Compression Support
//!
//! - Gzip (.gz) - detected by magic bytes

mod capture;
mod decompress;

pub use capture::CaptureData;
pub use decompress::Compression;
