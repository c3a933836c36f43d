//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::OutputFormat;
use crate::engine::DEFAULT_ENGINE;
use crate::job::DEFAULT_JOB_ROOT;
use crate::query::DEFAULT_PAGE_LIMIT;
use crate::shard::DEFAULT_WORKERS;

/// Run Zeek over flow-hashed PCAP shards and query the merged logs.
#[derive(Parser, Debug)]
#[command(name = "zeekshard")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Directory holding job directories
    #[arg(long = "job-root", env = "JOB_ROOT", default_value = DEFAULT_JOB_ROOT, global = true)]
    pub job_root: PathBuf,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Split a PCAP into flow-consistent shards and write the shard map
    Split {
        /// PCAP file to split
        #[arg(long, value_name = "FILE")]
        pcap: PathBuf,

        /// Directory for worker{i}.pcap and worker_map.log
        #[arg(long = "out-dir", value_name = "DIR")]
        out_dir: PathBuf,

        /// Number of shards (1-16)
        #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,
    },

    /// Merge per-worker logs into one log per name
    Merge {
        /// Directory containing worker*/logs/
        #[arg(long = "workers-dir", value_name = "DIR")]
        workers_dir: PathBuf,

        /// Output directory for merged logs
        #[arg(long = "merged-dir", value_name = "DIR")]
        merged_dir: PathBuf,
    },

    /// Run a whole job: split, analyze each shard, merge
    Run {
        /// Job directory containing input.pcap and user.zeek
        #[arg(long = "job-dir", value_name = "DIR")]
        job_dir: PathBuf,

        /// Number of shards (1-16)
        #[arg(short = 'w', long, default_value_t = DEFAULT_WORKERS)]
        workers: usize,

        /// Analysis engine binary
        #[arg(long, env = "ZEEK_BIN", default_value = DEFAULT_ENGINE)]
        zeek: String,
    },

    /// List the merged logs of a job
    Logs {
        /// Job id under the job root
        #[arg(long, value_name = "JOB_ID")]
        job: String,
    },

    /// Query a merged log of a job
    Query {
        /// Job id under the job root
        #[arg(long, value_name = "JOB_ID")]
        job: String,

        /// Log file name, e.g. conn.log
        #[arg(long, value_name = "NAME")]
        log: String,

        /// Boolean query, e.g. 'proto:tcp AND NOT id.resp_p=53'
        #[arg(short = 'q', long, default_value = "")]
        query: String,

        /// Number of matching rows to skip
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        offset: i64,

        /// Maximum rows to return (1-5000)
        #[arg(long, default_value_t = DEFAULT_PAGE_LIMIT, allow_hyphen_values = true)]
        limit: i64,

        /// Output format
        #[arg(long = "format", value_enum, default_value = "table")]
        format: OutputFormat,
    },
}
