//! Paths inside a job directory.

use std::path::{Path, PathBuf};

use crate::merge::{LOGS_DIR, WORKER_DIR_PREFIX};
use crate::shard::shard_path;

/// Uploaded capture.
pub const INPUT_PCAP: &str = "input.pcap";

/// Uploaded analysis script.
pub const SCRIPT_NAME: &str = "user.zeek";

/// Engine stdout, saved in each worker directory.
pub const ENGINE_STDOUT: &str = "zeek.stdout";

/// Engine stderr, saved in each worker directory.
pub const ENGINE_STDERR: &str = "zeek.stderr";

const SLICES_DIR: &str = "slices";
const WORKERS_DIR: &str = "workers";
const MERGED_DIR: &str = "merged";

/// A job directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDir {
    root: PathBuf,
}

impl JobDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn input_pcap(&self) -> PathBuf {
        self.root.join(INPUT_PCAP)
    }

    pub fn script(&self) -> PathBuf {
        self.root.join(SCRIPT_NAME)
    }

    pub fn slices_dir(&self) -> PathBuf {
        self.root.join(SLICES_DIR)
    }

    /// Shard capture for `worker` (1-based).
    pub fn slice(&self, worker: usize) -> PathBuf {
        shard_path(&self.slices_dir(), worker)
    }

    pub fn workers_dir(&self) -> PathBuf {
        self.root.join(WORKERS_DIR)
    }

    /// Engine working directory for `worker` (1-based).
    pub fn worker_dir(&self, worker: usize) -> PathBuf {
        self.workers_dir().join(format!("{WORKER_DIR_PREFIX}{worker}"))
    }

    pub fn worker_logs_dir(&self, worker: usize) -> PathBuf {
        self.worker_dir(worker).join(LOGS_DIR)
    }

    pub fn merged_dir(&self) -> PathBuf {
        self.root.join(MERGED_DIR)
    }
}
