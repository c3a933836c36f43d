//! Whole-capture access as a byte slice.

use std::fs::File;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::Path;

use memmap2::Mmap;
use tracing::debug;

use super::decompress::Compression;
use crate::error::{Error, PcapError};

/// Contents of a capture file.
pub enum CaptureData {
    /// Uncompressed file mapped into memory
    Mapped(Mmap),
    /// Decompressed file contents
    Owned(Vec<u8>),
}

impl CaptureData {
    /// Open a capture file, decompressing it if it is gzipped.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Pcap(PcapError::FileNotFound {
                path: path.display().to_string(),
            }),
            _ => Error::Io(e),
        })?;

        // Empty files cannot be mapped on every platform.
        if file.metadata()?.len() == 0 {
            return Ok(CaptureData::Owned(Vec::new()));
        }

        let mmap = unsafe { Mmap::map(&file).map_err(Error::Io)? };

        let compression = Compression::detect(&mmap);
        if compression.is_compressed() {
            debug!(path = %path.display(), %compression, "decompressing capture");
            let data = compression.decompress(&mmap)?;
            return Ok(CaptureData::Owned(data));
        }

        Ok(CaptureData::Mapped(mmap))
    }
}

impl Deref for CaptureData {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            CaptureData::Mapped(mmap) => &mmap[..],
            CaptureData::Owned(data) => data.as_slice(),
        }
    }
}

impl AsRef<[u8]> for CaptureData {
    fn as_ref(&self) -> &[u8] {
        self
    }
}
