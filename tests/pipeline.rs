//! Job pipeline tests: split, fake engine, merge, query.
//!
//! The fake engine copies fixture logs into its working directory, so the
//! whole pipeline runs without Zeek installed.

use std::fs;
use std::path::Path;

use zeekshard::engine::{AnalysisEngine, EngineOutput};
use zeekshard::error::{Error, JobError};
use zeekshard::job::{run_job, JobDir, JobStore};
use zeekshard::query::LogRequest;

/// Copies `conn.log` (every worker) and `dns.log` (odd workers only).
struct FixtureEngine;

impl AnalysisEngine for FixtureEngine {
    fn run_analysis(&self, _slice: &Path, _script: &Path, working_dir: &Path) -> Result<EngineOutput, Error> {
        let name = working_dir.file_name().unwrap().to_string_lossy().to_string();
        let n: u32 = name.trim_start_matches("worker").parse().unwrap();

        let mut conn = String::from(
            "#separator \\x09\n#path\tconn\n#fields\tts\tuid\tproto\tid.resp_p\n#types\ttime\tstring\tenum\tport\n",
        );
        for i in 0..5u32 {
            let proto = if i % 2 == 0 { "tcp" } else { "udp" };
            let port = if i % 2 == 0 { 443 } else { 53 };
            conn.push_str(&format!("{}.{i}\tC{n}x{i}\t{proto}\t{port}\n", 1000 + i * 4 + n));
        }
        conn.push_str("#close\t2024-01-01-00-00-00\n");
        fs::write(working_dir.join("conn.log"), conn).unwrap();

        if n % 2 == 1 {
            fs::write(
                working_dir.join("dns.log"),
                format!("#fields\tts\tquery\n{n}.0\thost{n}.example.com\n"),
            )
            .unwrap();
        }

        Ok(EngineOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        })
    }
}

fn build_capture(packets: u8) -> Vec<u8> {
    let mut data = vec![0xd4, 0xc3, 0xb2, 0xa1, 0x02, 0x00, 0x04, 0x00];
    data.extend_from_slice(&[0u8; 8]);
    data.extend_from_slice(&65535u32.to_le_bytes());
    data.extend_from_slice(&1u32.to_le_bytes());
    for i in 0..packets {
        let mut frame = vec![0u8; 12];
        frame.extend_from_slice(&[0x86, 0xdd]); // not parsed as IPv6: too short
        frame.push(i);
        data.extend_from_slice(&u32::from(i).to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(&(frame.len() as u32).to_le_bytes());
        data.extend_from_slice(&frame);
    }
    data
}

fn run_fixture_job(root: &Path, workers: usize) -> JobStore {
    let job = JobDir::new(root.join("job42"));
    fs::create_dir_all(job.root()).unwrap();
    fs::write(job.input_pcap(), build_capture(20)).unwrap();
    fs::write(job.script(), "@load base/protocols/conn\n").unwrap();

    run_job(&job, workers, &FixtureEngine).unwrap();
    JobStore::new(root)
}

#[test]
fn test_merged_logs_are_listed() {
    let tmp = tempfile::tempdir().unwrap();
    let store = run_fixture_job(tmp.path(), 3);

    assert_eq!(
        store.list_logs("job42").unwrap(),
        vec!["conn.log", "dns.log", "worker_map.log"]
    );
}

#[test]
fn test_merged_rows_are_time_ordered() {
    let tmp = tempfile::tempdir().unwrap();
    let store = run_fixture_job(tmp.path(), 4);

    let page = store
        .query_log("job42", "conn.log", &LogRequest::default())
        .unwrap();
    assert_eq!(page.total, 20);
    assert_eq!(page.fields, vec!["ts", "uid", "proto", "id.resp_p"]);
    assert_eq!(page.header[1], "#path\tconn");

    let ts: Vec<f64> = page.rows.iter().map(|r| r.get("ts").parse().unwrap()).collect();
    assert!(ts.windows(2).all(|w| w[0] <= w[1]));

    let dns = store
        .query_log("job42", "dns.log", &LogRequest::default())
        .unwrap();
    let queries: Vec<&str> = dns.rows.iter().map(|r| r.get("query")).collect();
    assert_eq!(queries, vec!["host1.example.com", "host3.example.com"]);
}

#[test]
fn test_query_and_pagination() {
    let tmp = tempfile::tempdir().unwrap();
    let store = run_fixture_job(tmp.path(), 2);

    let request = LogRequest::new("proto:tcp AND NOT uid:C2*")
        .with_offset(1)
        .with_limit(2);
    let page = store.query_log("job42", "conn.log", &request).unwrap();

    // Worker 1 contributes three tcp rows, none with a C2 uid.
    assert_eq!(page.total, 3);
    assert_eq!((page.offset, page.limit), (1, 2));
    assert_eq!(page.rows.len(), 2);
    assert!(page.rows.iter().all(|r| r.get("proto") == "tcp"));
    assert!(page.rows.iter().all(|r| r.get("uid").starts_with("C1")));

    let page = store
        .query_log("job42", "conn.log", &LogRequest::new("id.resp_p=53 OR 443").with_limit(0))
        .unwrap();
    assert_eq!(page.total, 10);
    assert_eq!(page.limit, 1);
}

#[test]
fn test_worker_map_is_queryable() {
    let tmp = tempfile::tempdir().unwrap();
    let store = run_fixture_job(tmp.path(), 3);

    let page = store
        .query_log("job42", "worker_map.log", &LogRequest::new("ip_ver:0").with_limit(5000))
        .unwrap();
    assert_eq!(page.total, 20);
    let packets: u64 = page.rows.iter().map(|r| r.get("pkt_count").parse::<u64>().unwrap()).sum();
    assert_eq!(packets, 20);
}

#[test]
fn test_unknown_job_and_log() {
    let tmp = tempfile::tempdir().unwrap();
    let store = run_fixture_job(tmp.path(), 1);

    assert!(matches!(
        store.list_logs("nope"),
        Err(Error::Job(JobError::NotFound { .. }))
    ));
    assert!(matches!(
        store.query_log("job42", "http.log", &LogRequest::default()),
        Err(Error::Job(JobError::NotFound { .. }))
    ));
}
