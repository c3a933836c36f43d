//! Jobs: one capture, one script, N engine runs and the merged results.
//!
//! A job directory looks like this:
//!
//! ```text
//! <job>/
//!   input.pcap
//!   user.zeek
//!   slices/worker1.pcap .. workerN.pcap, worker_map.log
//!   workers/worker1/{zeek.stdout, zeek.stderr, logs/*.log}
//!   merged/*.log, worker_map.log
//! ```

mod layout;
mod runner;
mod store;

pub use layout::{JobDir, ENGINE_STDERR, ENGINE_STDOUT, INPUT_PCAP, SCRIPT_NAME};
pub use runner::{run_job, JobSummary};
pub use store::{JobStore, DEFAULT_JOB_ROOT};
