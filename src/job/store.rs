//! Looking up finished jobs and their logs.

use std::fs;
use std::path::{self, PathBuf};

use tracing::debug;

use super::layout::JobDir;
use crate::error::{Error, JobError};
use crate::query::{select, LogPage, LogRequest};
use crate::zeeklog::{ZeekLog, LOG_EXTENSION};

/// Default directory holding job directories.
pub const DEFAULT_JOB_ROOT: &str = "/data/jobs";

/// A directory of jobs, keyed by job id.
#[derive(Debug, Clone)]
pub struct JobStore {
    root: PathBuf,
}

/// A single path component that stays inside its parent directory.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(path::is_separator)
}

fn not_found(what: String) -> Error {
    JobError::NotFound { what }.into()
}

impl JobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &std::path::Path {
        &self.root
    }

    /// The directory of job `id`.
    pub fn job(&self, id: &str) -> Result<JobDir, Error> {
        if !is_plain_name(id) {
            return Err(not_found(format!("job {id}")));
        }
        let dir = self.root.join(id);
        if !dir.is_dir() {
            return Err(not_found(format!("job {id}")));
        }
        Ok(JobDir::new(dir))
    }

    /// Names of the merged logs of job `id`, sorted.
    ///
    /// A job that has not been merged yet has no logs.
    pub fn list_logs(&self, id: &str) -> Result<Vec<String>, Error> {
        let merged = self.job(id)?.merged_dir();
        if !merged.is_dir() {
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = fs::read_dir(&merged)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
            .filter_map(|path| path.file_name().and_then(|n| n.to_str()).map(str::to_string))
            .collect();
        names.sort();
        Ok(names)
    }

    /// Query one merged log of job `id`.
    pub fn query_log(&self, id: &str, name: &str, request: &LogRequest) -> Result<LogPage, Error> {
        let job = self.job(id)?;
        if !is_plain_name(name) {
            return Err(not_found(format!("log {name} of job {id}")));
        }
        let path = job.merged_dir().join(name);
        if !path.is_file() {
            return Err(not_found(format!("log {name} of job {id}")));
        }

        let log = ZeekLog::read(&path)?;
        let page = select(&log, request);
        debug!(job = id, log = name, total = page.total, returned = page.rows.len(), "queried log");
        Ok(page)
    }
}
