//! Sandboxed subprocess execution shared by all external-tool runners.
//!
//! Every invocation owns a scoped scratch directory: the input structure is
//! written there, the child process runs with the scratch directory as its
//! working directory, and stdout/stderr are captured to files inside it so a
//! killed child still yields its partial output. The scratch directory (and
//! everything the tool wrote into it) is removed on all exit paths when the
//! [`ScratchDir`] is dropped. The parent process working directory is never
//! modified, so concurrent invocations cannot race.

use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Captured output of a bounded subprocess run.
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code; `None` if the child was killed (timeout) or terminated by
    /// a signal.
    pub return_code: Option<i32>,
    pub timed_out: bool,
    pub elapsed: Duration,
}

impl ProcessOutput {
    /// A run counts as successful only on a zero exit code within the
    /// configured time bound.
    pub fn success(&self) -> bool {
        !self.timed_out && self.return_code == Some(0)
    }
}

/// A scoped temporary working directory for one tool invocation.
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    pub fn create() -> io::Result<Self> {
        Ok(Self {
            dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Writes input content (typically the serialized PDB text) into the
    /// scratch directory and returns its absolute path.
    pub fn write_input(&self, file_name: &str, contents: &str) -> io::Result<PathBuf> {
        let path = self.dir.path().join(file_name);
        std::fs::write(&path, contents)?;
        Ok(path)
    }
}

/// Runs `command` with its working directory set to `working_dir`, waiting at
/// most `limit` of wall-clock time.
///
/// On timeout the child is killed and the captured partial output is
/// returned with `timed_out = true`; callers treat this exactly like a
/// non-zero exit.
pub fn run_with_timeout(
    command: &mut Command,
    working_dir: &Path,
    limit: Duration,
) -> io::Result<ProcessOutput> {
    let stdout_path = working_dir.join("proteval-stdout.log");
    let stderr_path = working_dir.join("proteval-stderr.log");

    let started = Instant::now();
    let mut child = command
        .current_dir(working_dir)
        .stdin(Stdio::null())
        .stdout(File::create(&stdout_path)?)
        .stderr(File::create(&stderr_path)?)
        .spawn()?;

    let (return_code, timed_out) = match child.wait_timeout(limit)? {
        Some(status) => (status.code(), false),
        None => {
            warn!(limit_secs = limit.as_secs(), "Tool exceeded its run-time bound; killing it.");
            child.kill()?;
            child.wait()?;
            (None, true)
        }
    };
    let elapsed = started.elapsed();

    let stdout = std::fs::read_to_string(&stdout_path).unwrap_or_default();
    let stderr = std::fs::read_to_string(&stderr_path).unwrap_or_default();
    debug!(
        return_code = ?return_code,
        timed_out,
        elapsed_ms = elapsed.as_millis() as u64,
        "Subprocess finished."
    );

    Ok(ProcessOutput {
        stdout,
        stderr,
        return_code,
        timed_out,
        elapsed,
    })
}
