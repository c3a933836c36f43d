//! Error types for zeekshard.

use thiserror::Error;

/// Main error type for zeekshard operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Error reading or parsing a capture file
    #[error("PCAP error: {0}")]
    Pcap(#[from] PcapError),

    /// Error running or inspecting a job
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors related to capture file reading.
#[derive(Error, Debug)]
pub enum PcapError {
    /// File not found
    #[error("File not found: {path}")]
    FileNotFound { path: String },

    /// Invalid capture format (too short to hold a global header)
    #[error("Invalid PCAP format: {reason}")]
    InvalidFormat { reason: String },
}

/// Errors related to job execution and lookup.
#[derive(Error, Debug)]
pub enum JobError {
    /// A required job input is absent
    #[error("Missing job input: {path}")]
    MissingInput { path: String },

    /// Worker count outside the accepted range
    #[error("Invalid worker count {count}: must be between 1 and {max}")]
    InvalidWorkerCount { count: usize, max: usize },

    /// The analysis engine could not be started
    #[error("Failed to start analysis engine {program}: {reason}")]
    EngineUnavailable { program: String, reason: String },

    /// The analysis engine exited unsuccessfully
    #[error("Analysis engine failed for worker{worker} (exit code {code:?}): {stderr}")]
    EngineFailure {
        worker: usize,
        code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    /// Requested job or log does not exist
    #[error("Not found: {what}")]
    NotFound { what: String },
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_engine_failure_message_includes_stderr() {
        let err: Error = JobError::EngineFailure {
            worker: 3,
            code: Some(1),
            stdout: String::new(),
            stderr: "fatal error in user.zeek, line 2".to_string(),
        }
        .into();

        let msg = err.to_string();
        assert!(msg.contains("worker3"));
        assert!(msg.contains("user.zeek, line 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }
}
