//! PCAP file writer.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use super::header::GlobalHeader;
use super::reader::RawRecord;
use crate::error::Error;

/// Buffer size for writing shard files (64KB).
const BUFFER_SIZE: usize = 65536;

/// Buffered writer producing a PCAP file.
///
/// Buffered bytes are flushed by [`PcapWriter::finish`], or on drop if the
/// writer goes out of scope early.
pub struct PcapWriter<W: Write = BufWriter<File>> {
    inner: W,
    path: Option<PathBuf>,
    packets: u64,
}

impl PcapWriter {
    /// Create (or truncate) a PCAP file at `path`.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let file = File::create(path)?;
        Ok(Self {
            inner: BufWriter::with_capacity(BUFFER_SIZE, file),
            path: Some(path.to_path_buf()),
            packets: 0,
        })
    }
}

impl<W: Write> PcapWriter<W> {
    /// Wrap an arbitrary writer.
    pub fn new(inner: W) -> Self {
        Self {
            inner,
            path: None,
            packets: 0,
        }
    }

    /// Path of the file being written, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Number of packets appended so far.
    pub fn packet_count(&self) -> u64 {
        self.packets
    }

    /// Write the global header, byte-for-byte as it was read.
    pub fn write_global_header(&mut self, header: &GlobalHeader) -> Result<(), Error> {
        self.inner.write_all(&header.raw)?;
        Ok(())
    }

    /// Append one record: its header bytes followed by its payload.
    pub fn append_packet(&mut self, record: &RawRecord<'_>) -> Result<(), Error> {
        self.inner.write_all(record.header_bytes)?;
        self.inner.write_all(record.data)?;
        self.packets += 1;
        Ok(())
    }

    /// Flush buffered bytes and return the underlying writer.
    pub fn finish(mut self) -> Result<W, Error> {
        self.inner.flush()?;
        Ok(self.inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap::{iterate_packets, read_global_header};

    fn capture_with_one_packet() -> Vec<u8> {
        let mut data = vec![0xd4, 0xc3, 0xb2, 0xa1, 2, 0, 4, 0];
        data.extend_from_slice(&[0; 8]);
        data.extend_from_slice(&65535u32.to_le_bytes());
        data.extend_from_slice(&1u32.to_le_bytes());

        data.extend_from_slice(&7u32.to_le_bytes());
        data.extend_from_slice(&9u32.to_le_bytes());
        data.extend_from_slice(&4u32.to_le_bytes());
        data.extend_from_slice(&60u32.to_le_bytes());
        data.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        data
    }

    #[test]
    fn test_copy_is_byte_identical() {
        let input = capture_with_one_packet();
        let (header, offset) = read_global_header(&input).unwrap();

        let mut writer = PcapWriter::new(Vec::new());
        writer.write_global_header(&header).unwrap();
        for record in iterate_packets(&input, offset) {
            writer.append_packet(&record).unwrap();
        }
        assert_eq!(writer.packet_count(), 1);

        let output = writer.finish().unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_create_file_flushes_on_finish() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.pcap");
        let input = capture_with_one_packet();
        let (header, _) = read_global_header(&input).unwrap();

        let mut writer = PcapWriter::create(&path).unwrap();
        assert_eq!(writer.path(), Some(path.as_path()));
        writer.write_global_header(&header).unwrap();
        writer.finish().unwrap();

        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, &input[..24]);
    }

    #[test]
    fn test_drop_flushes_buffered_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dropped.pcap");
        let input = capture_with_one_packet();
        let (header, _) = read_global_header(&input).unwrap();

        {
            let mut writer = PcapWriter::create(&path).unwrap();
            writer.write_global_header(&header).unwrap();
        }

        assert_eq!(std::fs::read(&path).unwrap().len(), 24);
    }
}
