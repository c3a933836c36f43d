//! zeekshard CLI entry point.

use std::io;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use zeekshard::cli::{Args, Command, OutputFormatter};
use zeekshard::engine::ZeekEngine;
use zeekshard::job::{run_job, JobDir, JobStore};
use zeekshard::merge::merge_worker_logs;
use zeekshard::query::LogRequest;
use zeekshard::shard::split_pcap;

fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Set up logging
    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();

    let store = JobStore::new(&args.job_root);

    match args.command {
        Command::Split {
            pcap,
            out_dir,
            workers,
        } => {
            let map = split_pcap(&pcap, &out_dir, workers)
                .with_context(|| format!("Failed to split PCAP file: {}", pcap.display()))?;
            println!("Wrote {workers} shards to {}", out_dir.display());
            println!("Wrote worker map: {}", map.display());
        }

        Command::Merge {
            workers_dir,
            merged_dir,
        } => {
            let merged = merge_worker_logs(&workers_dir, &merged_dir).with_context(|| {
                format!("Failed to merge worker logs in {}", workers_dir.display())
            })?;
            for log in &merged {
                println!("{}\t{} rows from {} workers", log.name, log.rows, log.sources);
            }
        }

        Command::Run {
            job_dir,
            workers,
            zeek,
        } => {
            let engine = ZeekEngine::new(zeek);
            let job = JobDir::new(&job_dir);
            let summary = run_job(&job, workers, &engine)
                .with_context(|| format!("Job failed: {}", job_dir.display()))?;
            println!("Merged logs at {}", job.merged_dir().display());
            for name in summary.log_names() {
                println!("  {name}");
            }
        }

        Command::Logs { job } => {
            let logs = store
                .list_logs(&job)
                .with_context(|| format!("Failed to list logs of job {job}"))?;
            for name in logs {
                println!("{name}");
            }
        }

        Command::Query {
            job,
            log,
            query,
            offset,
            limit,
            format,
        } => {
            let request = LogRequest::new(query).with_offset(offset).with_limit(limit);
            let page = store
                .query_log(&job, &log, &request)
                .with_context(|| format!("Failed to query {log} of job {job}"))?;

            let mut stdout = io::stdout();
            OutputFormatter::new(format).write(&page, &mut stdout)?;
        }
    }

    Ok(())
}
