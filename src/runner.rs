//! The boundary between the harness and the binary under test.
//!
//! Everything the harness knows about the compiler goes through
//! [`BinaryRunner`], which keeps the executor and coordinator testable with an
//! in-memory stand-in.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::errors::HarnessError;
use crate::fixture::trim_section;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Arguments appended to every fixture invocation.
#[cfg(windows)]
const PLATFORM_ARGS: &[&str] = &["--no-abort-fault"];
#[cfg(not(windows))]
const PLATFORM_ARGS: &[&str] = &[];

/// Operations the harness needs from the external binary.
pub trait BinaryRunner {
    /// Asks the binary which target it was built for.
    fn query_target(&self) -> Result<String, HarnessError>;

    /// Runs the binary on `input`, writing its stdout and stderr to `output`.
    ///
    /// The exit status is not returned: fixtures are judged on
    /// captured text alone.
    fn execute(&self, input: &Path, args: &[String], output: &Path) -> Result<(), HarnessError>;
}

/// Runs a real executable as a child process.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    binary: PathBuf,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            timeout: None,
        }
    }

    /// Kills a fixture's process once it has run for longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    fn launch_error(&self, source: std::io::Error) -> HarnessError {
        HarnessError::SubprocessLaunch {
            binary: self.binary.clone(),
            source,
        }
    }

    /// Waits for `child`, honouring the configured timeout.
    ///
    /// Returns `None` when the process had to be killed.
    fn wait(&self, child: &mut Child) -> std::io::Result<Option<ExitStatus>> {
        let Some(timeout) = self.timeout else {
            return child.wait().map(Some);
        };
        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if started.elapsed() >= timeout {
                let _ = child.kill();
                child.wait()?;
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl BinaryRunner for ProcessRunner {
    fn query_target(&self) -> Result<String, HarnessError> {
        let output = Command::new(&self.binary)
            .arg("--target")
            .stderr(Stdio::inherit())
            .output()
            .map_err(|source| HarnessError::TargetQuery {
                binary: self.binary.clone(),
                source,
            })?;
        let target = trim_section(&String::from_utf8_lossy(&output.stdout)).to_string();
        debug!(binary = %self.binary.display(), %target, "queried target");
        Ok(target)
    }

    fn execute(&self, input: &Path, args: &[String], output: &Path) -> Result<(), HarnessError> {
        let stdout = File::create(output).map_err(|e| HarnessError::artifact(output, e))?;
        let stderr = stdout
            .try_clone()
            .map_err(|e| HarnessError::artifact(output, e))?;

        debug!(binary = %self.binary.display(), input = %input.display(), ?args, "running fixture");
        let mut child = Command::new(&self.binary)
            .arg(input)
            .args(args)
            .args(PLATFORM_ARGS)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::from(stderr))
            .spawn()
            .map_err(|e| self.launch_error(e))?;

        match self.wait(&mut child).map_err(|e| self.launch_error(e))? {
            Some(status) => debug!(%status, "binary exited"),
            None => {
                let limit = self.timeout.unwrap_or_default();
                warn!(input = %input.display(), ?limit, "binary timed out and was killed");
                let mut out = OpenOptions::new()
                    .append(true)
                    .open(output)
                    .map_err(|e| HarnessError::artifact(output, e))?;
                writeln!(out, "\n*** timed out after {:?} ***", limit)
                    .map_err(|e| HarnessError::artifact(output, e))?;
            }
        }
        Ok(())
    }
}
