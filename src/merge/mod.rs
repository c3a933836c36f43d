//! Merging per-worker Zeek logs.
//!
//! Each worker directory holds a `logs/` directory written by one engine run.
//! Logs with the same file name are concatenated across workers (in worker
//! name order) and, when the first worker's copy declares a `ts` field,
//! stably sorted by timestamp.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::Error;
use crate::zeeklog::{ZeekLog, LOG_EXTENSION};

/// Prefix of worker directory names.
pub const WORKER_DIR_PREFIX: &str = "worker";

/// Name of the per-worker directory holding engine logs.
pub const LOGS_DIR: &str = "logs";

/// Summary of one merged log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedLog {
    pub name: String,
    /// Number of workers that contributed a copy.
    pub sources: usize,
    pub rows: usize,
}

/// Worker directories under `workers_dir` that contain a `logs/` directory,
/// sorted by name.
fn worker_log_dirs(workers_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(workers_dir)? {
        let entry = entry?;
        let name = entry.file_name();
        if !name.to_string_lossy().starts_with(WORKER_DIR_PREFIX) {
            continue;
        }
        let logs = entry.path().join(LOGS_DIR);
        if logs.is_dir() {
            dirs.push(logs);
        } else {
            debug!(worker = %name.to_string_lossy(), "no logs directory, skipping");
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// `*.log` files of one worker, sorted by name.
fn log_files(logs_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut files: Vec<PathBuf> = fs::read_dir(logs_dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == LOG_EXTENSION))
        .collect();
    files.sort();
    Ok(files)
}

/// Group log files by file name, keeping worker order within each group.
fn group_by_name(workers_dir: &Path) -> Result<BTreeMap<String, Vec<PathBuf>>, Error> {
    let mut groups: BTreeMap<String, Vec<PathBuf>> = BTreeMap::new();
    for logs_dir in worker_log_dirs(workers_dir)? {
        for path in log_files(&logs_dir)? {
            if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                groups.entry(name.to_string()).or_default().push(path);
            }
        }
    }
    Ok(groups)
}

/// Parse the value of a timestamp column, defaulting to 0.0.
fn timestamp_of(line: &str, index: usize) -> f64 {
    ZeekLog::column(line, index)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .unwrap_or(0.0)
}

/// Merge copies of one log into a single log.
///
/// The first copy supplies the header and field list. Rows of every copy
/// are appended in order regardless of their own field lists.
pub fn merge_logs<I>(copies: I) -> Option<ZeekLog>
where
    I: IntoIterator<Item = ZeekLog>,
{
    let mut copies = copies.into_iter();
    let mut merged = copies.next()?;
    for copy in copies {
        if copy.fields != merged.fields {
            debug!("merging log copy with a different field list");
        }
        merged.rows.extend(copy.rows);
    }

    if let Some(ts) = merged.timestamp_index() {
        merged
            .rows
            .sort_by(|a, b| timestamp_of(a, ts).total_cmp(&timestamp_of(b, ts)));
    }

    Some(merged)
}

/// Merge every worker's logs under `workers_dir` into `merged_dir`.
///
/// Worker logs are only read. Returns one summary per merged log, in name
/// order.
pub fn merge_worker_logs<P, Q>(workers_dir: P, merged_dir: Q) -> Result<Vec<MergedLog>, Error>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let workers_dir = workers_dir.as_ref();
    let merged_dir = merged_dir.as_ref();
    fs::create_dir_all(merged_dir)?;

    let mut summaries = Vec::new();
    for (name, paths) in group_by_name(workers_dir)? {
        let copies: Vec<ZeekLog> = paths
            .iter()
            .filter_map(|path| match ZeekLog::read(path) {
                Ok(log) => Some(log),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable log");
                    None
                }
            })
            .collect();
        let sources = copies.len();

        let Some(merged) = merge_logs(copies) else {
            continue;
        };
        merged.write(merged_dir.join(&name))?;

        debug!(log = %name, sources, rows = merged.rows.len(), "merged log");
        summaries.push(MergedLog {
            name,
            sources,
            rows: merged.rows.len(),
        });
    }

    info!(logs = summaries.len(), "merged worker logs");
    Ok(summaries)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_log(workers_dir: &Path, worker: &str, name: &str, text: &str) {
        let dir = workers_dir.join(worker).join(LOGS_DIR);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), text).unwrap();
    }

    #[test]
    fn test_merge_sorts_by_ts() {
        let a = ZeekLog::parse("#fields\tts\tuid\n3.0\tA1\n1.0\tA2\n");
        let b = ZeekLog::parse("#fields\tts\tuid\n2.0\tB1\n");

        let merged = merge_logs([a, b]).unwrap();
        assert_eq!(merged.rows, vec!["1.0\tA2", "2.0\tB1", "3.0\tA1"]);
    }

    #[test]
    fn test_merge_without_ts_keeps_order() {
        let a = ZeekLog::parse("#fields\tname\nz\na\n");
        let b = ZeekLog::parse("#fields\tname\nm\n");

        let merged = merge_logs([a, b]).unwrap();
        assert_eq!(merged.rows, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_unparseable_ts_sorts_as_zero_and_is_stable() {
        let a = ZeekLog::parse("#fields\tuid\tts\nA\t5\nB\t-\nC\nD\t0\n");

        let merged = merge_logs([a]).unwrap();
        assert_eq!(merged.rows, vec!["B\t-", "C", "D\t0", "A\t5"]);
    }

    #[test]
    fn test_first_copy_header_wins() {
        let a = ZeekLog::parse("#path\tdns\n#fields\tts\tquery\n1\tx.com\n");
        let b = ZeekLog::parse("#path\tdns\n#fields\tts\tquery\tanswers\n0.5\ty.com\t1.2.3.4\n");

        let merged = merge_logs([a, b]).unwrap();
        assert_eq!(merged.header, vec!["#path\tdns", "#fields\tts\tquery"]);
        assert_eq!(merged.rows, vec!["0.5\ty.com\t1.2.3.4", "1\tx.com"]);
    }

    #[test]
    fn test_merge_no_copies() {
        assert!(merge_logs(Vec::new()).is_none());
    }

    #[test]
    fn test_merge_worker_logs_groups_by_name() {
        let root = tempfile::tempdir().unwrap();
        let workers = root.path().join("workers");
        let merged = root.path().join("merged");

        write_log(&workers, "worker1", "conn.log", "#fields\tts\tuid\n2\tC1\n#close\tx\n");
        write_log(&workers, "worker2", "conn.log", "#fields\tts\tuid\n1\tC2\n#close\ty\n");
        write_log(&workers, "worker2", "dns.log", "#fields\tts\tquery\n5\texample.com\n");
        write_log(&workers, "worker2", "notes.txt", "ignored");
        fs::create_dir_all(workers.join("worker3")).unwrap(); // No logs directory
        fs::create_dir_all(workers.join("other").join(LOGS_DIR)).unwrap();

        let summaries = merge_worker_logs(&workers, &merged).unwrap();
        assert_eq!(
            summaries,
            vec![
                MergedLog { name: "conn.log".to_string(), sources: 2, rows: 2 },
                MergedLog { name: "dns.log".to_string(), sources: 1, rows: 1 },
            ]
        );

        let conn = fs::read_to_string(merged.join("conn.log")).unwrap();
        assert_eq!(conn, "#fields\tts\tuid\n#close\tx\n1\tC2\n2\tC1\n");
        assert!(!merged.join("notes.txt").exists());
    }

    #[test]
    fn test_merge_is_idempotent_and_read_only() {
        let root = tempfile::tempdir().unwrap();
        let workers = root.path().join("workers");
        let merged = root.path().join("merged");
        let original = "#fields\tts\n9\n1\n";
        write_log(&workers, "worker1", "x.log", original);

        merge_worker_logs(&workers, &merged).unwrap();
        let first = fs::read_to_string(merged.join("x.log")).unwrap();
        merge_worker_logs(&workers, &merged).unwrap();
        let second = fs::read_to_string(merged.join("x.log")).unwrap();

        assert_eq!(first, second);
        let worker_copy = workers.join("worker1").join(LOGS_DIR).join("x.log");
        assert_eq!(fs::read_to_string(worker_copy).unwrap(), original);
    }
}
