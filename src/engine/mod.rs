//! The external analysis engine.
//!
//! The pipeline only needs one capability from the engine: analyze a
//! capture slice with a script, writing logs into a working directory.
//! [`AnalysisEngine`] is that seam; [`ZeekEngine`] runs the real binary.

use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::error::{Error, JobError};

/// Default engine binary.
pub const DEFAULT_ENGINE: &str = "zeek";

/// Outcome of one engine run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl EngineOutput {
    /// Whether the engine exited with status 0.
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs an analysis over one capture slice.
///
/// Implementations write their log files into `working_dir`. A non-zero
/// exit is reported through [`EngineOutput`], not as an error; errors mean
/// the engine could not be run at all.
pub trait AnalysisEngine: Send + Sync {
    fn run_analysis(&self, slice: &Path, script: &Path, working_dir: &Path) -> Result<EngineOutput, Error>;
}

/// Runs `zeek -r <slice> <script>` inside the working directory.
#[derive(Debug, Clone)]
pub struct ZeekEngine {
    program: String,
}

impl Default for ZeekEngine {
    fn default() -> Self {
        Self::new(DEFAULT_ENGINE)
    }
}

impl ZeekEngine {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl AnalysisEngine for ZeekEngine {
    fn run_analysis(&self, slice: &Path, script: &Path, working_dir: &Path) -> Result<EngineOutput, Error> {
        debug!(
            program = %self.program,
            slice = %slice.display(),
            cwd = %working_dir.display(),
            "starting analysis engine"
        );

        let output = Command::new(&self.program)
            .arg("-r")
            .arg(slice)
            .arg(script)
            .current_dir(working_dir)
            .output()
            .map_err(|e| JobError::EngineUnavailable {
                program: self.program.clone(),
                reason: e.to_string(),
            })?;

        Ok(EngineOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
