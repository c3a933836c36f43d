//! Per-flow accounting for the shard map.

use std::collections::HashMap;
use std::io::Write;

use crate::error::Error;
use crate::flow::{FlowKey, FlowTuple};
use crate::zeeklog::ZeekLogWriter;

/// Fields of the shard map log.
pub const SHARD_MAP_FIELDS: [&str; 8] = [
    "worker", "ip_ver", "src_ip", "src_port", "dst_ip", "dst_port", "proto", "pkt_count",
];

/// Zeek types of [`SHARD_MAP_FIELDS`].
pub const SHARD_MAP_TYPES: [&str; 8] = [
    "count", "count", "string", "port", "string", "port", "count", "count",
];

/// Accumulated state of one flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowRecord {
    /// Shard id (1-based), fixed when the flow is first seen.
    pub worker: usize,
    pub tuple: FlowTuple,
    pub packets: u64,
    /// Order in which the flow was first seen (0-based).
    pub first_seen: u64,
}

impl FlowRecord {
    fn row(&self) -> [String; 8] {
        [
            self.worker.to_string(),
            self.tuple.ip_version.to_string(),
            self.tuple.src_ip.clone(),
            self.tuple.src_port.to_string(),
            self.tuple.dst_ip.clone(),
            self.tuple.dst_port.to_string(),
            self.tuple.protocol.to_string(),
            self.packets.to_string(),
        ]
    }
}

/// Flow key to flow record map, owned by one sharding run.
#[derive(Debug, Default)]
pub struct FlowTable {
    flows: HashMap<FlowKey, FlowRecord>,
}

impl FlowTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one packet of `key`, creating the record on first sight.
    ///
    /// Returns the flow's shard id. `assign` is only called for new flows
    /// and `tuple` is only kept for new flows.
    pub fn record(
        &mut self,
        key: FlowKey,
        tuple: FlowTuple,
        assign: impl FnOnce(&FlowKey) -> usize,
    ) -> usize {
        if let Some(existing) = self.flows.get_mut(&key) {
            existing.packets += 1;
            return existing.worker;
        }

        let worker = assign(&key);
        let first_seen = self.flows.len() as u64;
        self.flows.insert(
            key,
            FlowRecord {
                worker,
                tuple,
                packets: 1,
                first_seen,
            },
        );
        worker
    }

    /// Number of distinct flows.
    pub fn len(&self) -> usize {
        self.flows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flows.is_empty()
    }

    /// Records ordered by shard, then packet count descending, then
    /// ip version, source, destination and protocol. Remaining ties keep
    /// first-seen order.
    pub fn sorted(&self) -> Vec<&FlowRecord> {
        let mut rows: Vec<&FlowRecord> = self.flows.values().collect();
        rows.sort_by(|a, b| {
            a.worker
                .cmp(&b.worker)
                .then_with(|| b.packets.cmp(&a.packets))
                .then_with(|| a.tuple.ip_version.cmp(&b.tuple.ip_version))
                .then_with(|| a.tuple.src_ip.cmp(&b.tuple.src_ip))
                .then_with(|| a.tuple.dst_ip.cmp(&b.tuple.dst_ip))
                .then_with(|| a.tuple.protocol.cmp(&b.tuple.protocol))
                .then_with(|| a.first_seen.cmp(&b.first_seen))
        });
        rows
    }

    /// Write the shard map log.
    pub fn write_map<W: Write>(&self, out: W) -> Result<W, Error> {
        let mut writer = ZeekLogWriter::new(out, "worker_map", &SHARD_MAP_FIELDS, &SHARD_MAP_TYPES)?;
        for record in self.sorted() {
            writer.write_row(&record.row())?;
        }
        writer.finish()
    }
}
