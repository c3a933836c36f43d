//! PCAP record iteration over an in-memory capture.

use super::header::{GlobalHeader, RecordHeader, GLOBAL_HEADER_LEN, RECORD_HEADER_LEN};
use crate::error::{Error, PcapError};

/// One record borrowed from a capture buffer.
#[derive(Debug, Clone, Copy)]
pub struct RawRecord<'a> {
    /// Frame number (1-indexed).
    pub frame_number: u64,

    /// Byte offset of the record header within the capture.
    pub offset: usize,

    /// Decoded record header.
    pub header: RecordHeader,

    /// Record header bytes exactly as stored.
    pub header_bytes: &'a [u8],

    /// Captured payload bytes.
    pub data: &'a [u8],
}

/// Read the global header at the start of `data`.
///
/// Returns the header and the offset of the first record.
pub fn read_global_header(data: &[u8]) -> Result<(GlobalHeader, usize), Error> {
    let raw: [u8; GLOBAL_HEADER_LEN] = data
        .get(..GLOBAL_HEADER_LEN)
        .and_then(|b| b.try_into().ok())
        .ok_or_else(|| {
            Error::Pcap(PcapError::InvalidFormat {
                reason: format!(
                    "capture is {} bytes, smaller than the {GLOBAL_HEADER_LEN}-byte global header",
                    data.len()
                ),
            })
        })?;

    Ok((GlobalHeader::from_bytes(raw), GLOBAL_HEADER_LEN))
}

/// Iterate over the records of `data` starting at `offset`.
pub fn iterate_packets(data: &[u8], offset: usize) -> PacketIter<'_> {
    PacketIter {
        data,
        offset,
        frame_number: 0,
    }
}

/// Lazy iterator over PCAP records.
///
/// Stops without error when the remaining bytes cannot hold a full record
/// header or the declared payload; a truncated trailing record is dropped.
#[derive(Debug, Clone)]
pub struct PacketIter<'a> {
    data: &'a [u8],
    offset: usize,
    frame_number: u64,
}

impl<'a> PacketIter<'a> {
    /// Offset of the next record to be read.
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for PacketIter<'a> {
    type Item = RawRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.offset;
        let header_end = start.checked_add(RECORD_HEADER_LEN)?;
        let header_bytes = self.data.get(start..header_end)?;
        let header = RecordHeader::from_bytes(header_bytes.try_into().ok()?);

        let data_end = header_end.checked_add(header.captured_len as usize)?;
        let data = self.data.get(header_end..data_end)?;

        self.offset = data_end;
        self.frame_number += 1;

        Some(RawRecord {
            frame_number: self.frame_number,
            offset: start,
            header,
            header_bytes,
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global_header() -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(&[0xd4, 0xc3, 0xb2, 0xa1]); // Magic (little endian)
        data.extend_from_slice(&[0x02, 0x00]); // Version major (2)
        data.extend_from_slice(&[0x04, 0x00]); // Version minor (4)
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // Thiszone
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]); // Sigfigs
        data.extend_from_slice(&[0xff, 0xff, 0x00, 0x00]); // Snaplen (65535)
        data.extend_from_slice(&[0x01, 0x00, 0x00, 0x00]); // Network (Ethernet)
        data
    }

    fn push_record(data: &mut Vec<u8>, ts_sec: u32, payload: &[u8]) {
        data.extend_from_slice(&ts_sec.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        data.extend_from_slice(payload);
    }

    #[test]
    fn test_read_global_header_too_short() {
        let data = [0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00];
        let err = read_global_header(&data).unwrap_err();
        assert!(matches!(err, Error::Pcap(PcapError::InvalidFormat { .. })));
    }

    #[test]
    fn test_read_global_header_offset() {
        let data = global_header();
        let (header, offset) = read_global_header(&data).unwrap();
        assert_eq!(offset, GLOBAL_HEADER_LEN);
        assert_eq!(header.link_type, 1);
    }

    #[test]
    fn test_iterate_records() {
        let mut data = global_header();
        push_record(&mut data, 1, &[0xaa; 10]);
        push_record(&mut data, 2, &[0xbb; 3]);

        let records: Vec<_> = iterate_packets(&data, GLOBAL_HEADER_LEN).collect();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].frame_number, 1);
        assert_eq!(records[0].data, &[0xaa; 10]);
        assert_eq!(records[1].header.ts_sec, 2);
        assert_eq!(records[1].offset, GLOBAL_HEADER_LEN + RECORD_HEADER_LEN + 10);
        assert_eq!(records[1].header_bytes.len(), RECORD_HEADER_LEN);
    }

    #[test]
    fn test_truncated_trailing_record_dropped() {
        let mut data = global_header();
        push_record(&mut data, 1, &[0x01; 8]);
        push_record(&mut data, 2, &[0x02; 8]);
        data.truncate(data.len() - 3); // Cut into the second payload

        let records: Vec<_> = iterate_packets(&data, GLOBAL_HEADER_LEN).collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_partial_record_header_dropped() {
        let mut data = global_header();
        push_record(&mut data, 1, &[0x01; 4]);
        data.extend_from_slice(&[0x00; 7]); // Not a full record header

        let records: Vec<_> = iterate_packets(&data, GLOBAL_HEADER_LEN).collect();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_restart_from_offset() {
        let mut data = global_header();
        push_record(&mut data, 1, &[0x01; 4]);
        push_record(&mut data, 2, &[0x02; 4]);

        let mut iter = iterate_packets(&data, GLOBAL_HEADER_LEN);
        iter.next();
        let resume = iter.offset();

        let rest: Vec<_> = iterate_packets(&data, resume).collect();
        assert_eq!(rest.len(), 1);
        assert_eq!(rest[0].header.ts_sec, 2);
    }

    #[test]
    fn test_empty_capture_body() {
        let data = global_header();
        assert_eq!(iterate_packets(&data, GLOBAL_HEADER_LEN).count(), 0);
    }
}
