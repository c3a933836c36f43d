//! zeekshard - Run Zeek over flow-hashed slices of a PCAP and query the results.
//!
//! The pipeline splits a capture into N shards so that every packet of a
//! flow lands in the same shard, runs the analysis engine once per shard,
//! merges the per-shard logs into one time-ordered log per log type, and
//! answers paginated boolean queries over the merged logs.
//!
//! # Example
//!
//! ```no_run
//! use zeekshard::query::{select, LogRequest};
//! use zeekshard::shard::split_pcap;
//! use zeekshard::zeeklog::ZeekLog;
//!
//! fn main() -> anyhow::Result<()> {
//!     let map = split_pcap("capture.pcap", "slices", 4)?;
//!     let log = ZeekLog::read(&map)?;
//!     let page = select(&log, &LogRequest::new("proto:6 AND NOT dst_port:53").with_limit(50));
//!     println!("{} matching flows", page.total);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod engine;
pub mod error;
pub mod flow;
pub mod format;
pub mod io;
pub mod job;
pub mod merge;
pub mod pcap;
pub mod query;
pub mod shard;
pub mod zeeklog;

pub use error::{Error, Result};
