//! The sharding pass.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use ring::digest::{digest, SHA1_FOR_LEGACY_USE_ONLY};
use tracing::{debug, info};

use super::table::FlowTable;
use super::MAX_WORKERS;
use crate::error::{Error, JobError};
use crate::flow::{classify, FlowKey};
use crate::io::CaptureData;
use crate::pcap::{iterate_packets, read_global_header, PcapWriter, RawRecord};

/// File name of the shard map log.
pub const SHARD_MAP_NAME: &str = "worker_map.log";

/// Path of the capture for shard `worker` (1-based).
pub fn shard_path(out_dir: &Path, worker: usize) -> PathBuf {
    out_dir.join(format!("worker{worker}.pcap"))
}

/// Path of the shard map log.
pub fn map_path(out_dir: &Path) -> PathBuf {
    out_dir.join(SHARD_MAP_NAME)
}

/// Zero-based shard index of `key` among `workers` shards.
///
/// The first 8 bytes of the SHA-1 digest, read big-endian, modulo the
/// shard count.
pub fn shard_index(key: &FlowKey, workers: usize) -> usize {
    let hash = digest(&SHA1_FOR_LEGACY_USE_ONLY, key.as_bytes());
    let mut prefix = [0u8; 8];
    prefix.copy_from_slice(&hash.as_ref()[..8]);
    (u64::from_be_bytes(prefix) % workers as u64) as usize
}

pub(crate) fn check_workers(workers: usize) -> Result<(), Error> {
    if workers == 0 || workers > MAX_WORKERS {
        return Err(JobError::InvalidWorkerCount {
            count: workers,
            max: MAX_WORKERS,
        }
        .into());
    }
    Ok(())
}

/// Routes packets to shards and accounts for flows.
#[derive(Debug)]
pub struct FlowSharder {
    workers: usize,
    table: FlowTable,
    packets: u64,
}

impl FlowSharder {
    /// Create a sharder for `workers` shards.
    pub fn new(workers: usize) -> Result<Self, Error> {
        check_workers(workers)?;
        Ok(Self {
            workers,
            table: FlowTable::new(),
            packets: 0,
        })
    }

    /// Number of shards.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of packets routed so far.
    pub fn packet_count(&self) -> u64 {
        self.packets
    }

    /// Flow accounting collected so far.
    pub fn table(&self) -> &FlowTable {
        &self.table
    }

    /// Route one packet and return its shard id (1-based).
    pub fn route(&mut self, packet: &[u8]) -> usize {
        let (key, tuple) = classify(packet);
        let workers = self.workers;
        self.packets += 1;
        self.table
            .record(key, tuple, |key| shard_index(key, workers) + 1)
    }

    /// Route `records` into `outputs`, one writer per shard.
    pub fn shard_records<'a, W, I>(&mut self, records: I, outputs: &mut [PcapWriter<W>]) -> Result<(), Error>
    where
        W: std::io::Write,
        I: IntoIterator<Item = RawRecord<'a>>,
    {
        debug_assert_eq!(outputs.len(), self.workers);
        for record in records {
            let worker = self.route(record.data);
            outputs[worker - 1].append_packet(&record)?;
        }
        Ok(())
    }
}

/// Split `pcap` into `workers` flow-consistent shards under `out_dir`.
///
/// Writes `worker1.pcap` .. `workerN.pcap`, each starting with the input's
/// global header, plus `worker_map.log`. Returns the shard map path.
pub fn split_pcap<P, Q>(pcap: P, out_dir: Q, workers: usize) -> Result<PathBuf, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let pcap = pcap.as_ref();
    let out_dir = out_dir.as_ref();

    let mut sharder = FlowSharder::new(workers)?;
    fs::create_dir_all(out_dir)?;

    let capture = CaptureData::open(pcap)?;
    let (header, offset) = read_global_header(&capture)?;
    debug!(
        path = %pcap.display(),
        link_type = header.link_type,
        snaplen = header.snaplen,
        "read capture header"
    );

    // Writers flush when dropped, so an error part way through still
    // leaves every shard file closed with what was written.
    let mut outputs = (1..=workers)
        .map(|worker| PcapWriter::create(shard_path(out_dir, worker)))
        .collect::<Result<Vec<_>, _>>()?;
    for output in &mut outputs {
        output.write_global_header(&header)?;
    }

    sharder.shard_records(iterate_packets(&capture, offset), &mut outputs)?;

    for (i, output) in outputs.into_iter().enumerate() {
        debug!(worker = i + 1, packets = output.packet_count(), "closing shard");
        output.finish()?;
    }

    let map = map_path(out_dir);
    sharder
        .table()
        .write_map(BufWriter::new(File::create(&map)?))?;

    info!(
        packets = sharder.packet_count(),
        flows = sharder.table().len(),
        workers,
        "split capture into shards"
    );

    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PcapError;

    #[test]
    fn test_shard_index_in_range_and_stable() {
        for byte in 0..=255u8 {
            let key = classify(&[byte; 20]).0;
            let idx = shard_index(&key, 7);
            assert!(idx < 7);
            assert_eq!(idx, shard_index(&key, 7));
        }
    }

    #[test]
    fn test_single_worker_gets_everything() {
        let mut sharder = FlowSharder::new(1).unwrap();
        for byte in 0..10u8 {
            assert_eq!(sharder.route(&[byte; 30]), 1);
        }
        assert_eq!(sharder.packet_count(), 10);
        assert_eq!(sharder.table().len(), 10);
    }

    #[test]
    fn test_worker_count_bounds() {
        assert!(matches!(
            FlowSharder::new(0),
            Err(Error::Job(JobError::InvalidWorkerCount { count: 0, .. }))
        ));
        assert!(FlowSharder::new(MAX_WORKERS + 1).is_err());
        assert!(FlowSharder::new(MAX_WORKERS).is_ok());
    }

    #[test]
    fn test_split_rejects_short_capture() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tiny.pcap");
        fs::write(&input, [0xd4, 0xc3, 0xb2, 0xa1]).unwrap();

        let err = split_pcap(&input, dir.path().join("out"), 2).unwrap_err();
        assert!(matches!(err, Error::Pcap(PcapError::InvalidFormat { .. })));
    }

    #[test]
    fn test_shard_paths() {
        let dir = Path::new("/jobs/abc/slices");
        assert_eq!(shard_path(dir, 3), PathBuf::from("/jobs/abc/slices/worker3.pcap"));
        assert_eq!(map_path(dir), PathBuf::from("/jobs/abc/slices/worker_map.log"));
    }
}
