//! Running a job end to end.

use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use tracing::{debug, info, warn};

use super::layout::{JobDir, ENGINE_STDERR, ENGINE_STDOUT};
use crate::engine::{AnalysisEngine, EngineOutput};
use crate::error::{Error, JobError};
use crate::merge::{merge_worker_logs, MergedLog};
use crate::shard::{check_workers, split_pcap, SHARD_MAP_NAME};
use crate::zeeklog::LOG_EXTENSION;

/// What a finished job produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSummary {
    pub workers: usize,
    /// Shard map written by the split.
    pub map_path: PathBuf,
    /// Merged logs, in name order.
    pub logs: Vec<MergedLog>,
}

impl JobSummary {
    pub fn log_names(&self) -> Vec<&str> {
        self.logs.iter().map(|log| log.name.as_str()).collect()
    }
}

/// Split, analyze, merge.
///
/// Worker directories are recreated from scratch. Engines run in parallel,
/// one per shard; when any of them fails the job stops with
/// [`JobError::EngineFailure`] for the lowest-numbered failed worker and
/// nothing is merged.
pub fn run_job(job: &JobDir, workers: usize, engine: &dyn AnalysisEngine) -> Result<JobSummary, Error> {
    check_workers(workers)?;
    for input in [job.script(), job.input_pcap()] {
        if !input.is_file() {
            return Err(JobError::MissingInput {
                path: input.display().to_string(),
            }
            .into());
        }
    }

    // Engines run with the worker directory as cwd.
    let job = JobDir::new(fs::canonicalize(job.root())?);

    fs::create_dir_all(job.slices_dir())?;
    fs::create_dir_all(job.workers_dir())?;
    fs::create_dir_all(job.merged_dir())?;

    info!(job = %job.root().display(), workers, "splitting capture");
    let map_path = split_pcap(job.input_pcap(), job.slices_dir(), workers)?;

    for worker in 1..=workers {
        let dir = job.worker_dir(worker);
        if dir.exists() {
            fs::remove_dir_all(&dir)?;
        }
        fs::create_dir_all(job.worker_logs_dir(worker))?;
    }

    info!(workers, "running analysis engine on each slice");
    let outputs: Vec<Result<EngineOutput, Error>> = thread::scope(|scope| {
        let handles: Vec<_> = (1..=workers)
            .map(|worker| {
                let job = &job;
                scope.spawn(move || run_worker(job, worker, engine))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    });

    for (i, output) in outputs.into_iter().enumerate() {
        let output = output?;
        if !output.success() {
            return Err(JobError::EngineFailure {
                worker: i + 1,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            }
            .into());
        }
    }

    let logs = merge_worker_logs(job.workers_dir(), job.merged_dir())?;
    fs::copy(&map_path, job.merged_dir().join(SHARD_MAP_NAME))?;

    info!(logs = logs.len(), merged = %job.merged_dir().display(), "job finished");
    Ok(JobSummary {
        workers,
        map_path,
        logs,
    })
}

/// Run the engine for one worker and file its output.
fn run_worker(job: &JobDir, worker: usize, engine: &dyn AnalysisEngine) -> Result<EngineOutput, Error> {
    let dir = job.worker_dir(worker);
    let output = engine.run_analysis(&job.slice(worker), &job.script(), &dir)?;

    fs::write(dir.join(ENGINE_STDOUT), &output.stdout)?;
    fs::write(dir.join(ENGINE_STDERR), &output.stderr)?;

    if !output.success() {
        warn!(worker, code = ?output.code, "analysis engine failed");
        return Ok(output);
    }

    let moved = collect_logs(&dir, &job.worker_logs_dir(worker))?;
    debug!(worker, logs = moved, "analysis engine finished");
    Ok(output)
}

/// Move the `*.log` files an engine left in `dir` into `logs_dir`.
fn collect_logs(dir: &Path, logs_dir: &Path) -> Result<usize, Error> {
    let mut moved = 0;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != LOG_EXTENSION) {
            continue;
        }
        if let Some(name) = path.file_name() {
            fs::rename(&path, logs_dir.join(name))?;
            moved += 1;
        }
    }
    Ok(moved)
}
