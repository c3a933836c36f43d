//! Flow-hash sharding of a capture.
//!
//! A single pass over the capture routes every packet to one of N shard
//! files. The shard of a flow is chosen from a SHA-1 hash of its
//! [`FlowKey`](crate::flow::FlowKey) the first time the flow is seen and
//! reused for all of its later packets. After the pass a `worker_map.log`
//! lists every flow with its shard and packet count.

mod sharder;
mod table;

pub(crate) use sharder::check_workers;
pub use sharder::{map_path, shard_index, shard_path, split_pcap, FlowSharder, SHARD_MAP_NAME};
pub use table::{FlowRecord, FlowTable, SHARD_MAP_FIELDS, SHARD_MAP_TYPES};

/// Default number of shards.
pub const DEFAULT_WORKERS: usize = 7;

/// Largest accepted number of shards.
pub const MAX_WORKERS: usize = 16;
