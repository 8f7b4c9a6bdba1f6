//! Runs one fixture against the binary and classifies the result.
//!
//! Each fixture works on scratch files next to it that share its base name:
//!
//! | artifact      | contents                              | kept on failure |
//! |---------------|---------------------------------------|-----------------|
//! | `<base>.ir`   | the `--CODE--` section                | yes             |
//! | `<base>.out`  | combined stdout and stderr            | yes             |
//! | `<base>.exp`  | the `--EXPECT--` section plus newline | yes             |
//! | `<base>.diff` | unified diff of `.exp` against `.out` | yes             |
//!
//! A passing fixture leaves none of them behind.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::diff::unified_diff;
use crate::errors::HarnessError;
use crate::fixture::{trim_section, Fixture};
use crate::report::Outcome;
use crate::runner::BinaryRunner;

/// Scratch artifact locations for one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchPaths {
    pub input: PathBuf,
    pub output: PathBuf,
    pub expected: PathBuf,
    pub diff: PathBuf,
}

impl ScratchPaths {
    pub fn for_fixture(fixture_path: &Path) -> Self {
        Self {
            input: fixture_path.with_extension("ir"),
            output: fixture_path.with_extension("out"),
            expected: fixture_path.with_extension("exp"),
            diff: fixture_path.with_extension("diff"),
        }
    }

    fn all(&self) -> [&Path; 4] {
        [
            self.input.as_path(),
            self.output.as_path(),
            self.expected.as_path(),
            self.diff.as_path(),
        ]
    }

    /// Removes artifacts left over from an earlier run.
    fn clear(&self) {
        for path in self.all() {
            remove_if_present(path);
        }
    }
}

enum Comparison {
    Match,
    Mismatch,
}

/// Executes `fixture` and reports how it went.
///
/// Never fails: harness errors are folded into a `Failed` outcome carrying the
/// error message, so the caller can move on to the next fixture.
pub fn execute<R: BinaryRunner + ?Sized>(fixture: &Fixture, runner: &R) -> Outcome {
    let scratch = ScratchPaths::for_fixture(&fixture.path);
    scratch.clear();

    let name = fixture.name.clone();
    let path = fixture.path.clone();
    match compare(fixture, runner, &scratch) {
        Ok(Comparison::Match) => Outcome::Passed { name, path },
        Ok(Comparison::Mismatch) => match &fixture.xfail_reason {
            Some(reason) => Outcome::ExpectedFailed {
                name,
                path,
                reason: reason.clone(),
                diff: Some(scratch.diff),
            },
            None => Outcome::Failed {
                name,
                path,
                diff: Some(scratch.diff),
                error: None,
            },
        },
        Err(e) => {
            warn!(fixture = %fixture.path.display(), error = %e.detailed(), "fixture could not be executed");
            Outcome::Failed {
                name,
                path,
                diff: None,
                error: Some(e.detailed()),
            }
        }
    }
}

fn compare<R: BinaryRunner + ?Sized>(
    fixture: &Fixture,
    runner: &R,
    scratch: &ScratchPaths,
) -> Result<Comparison, HarnessError> {
    fs::write(&scratch.input, &fixture.code)
        .map_err(|e| HarnessError::artifact(&scratch.input, e))?;

    // A binary that cannot be started leaves an empty or missing capture,
    // which the comparison below reports.
    if let Err(e) = runner.execute(&scratch.input, &fixture.arg_list(), &scratch.output) {
        warn!(fixture = %fixture.path.display(), error = %e.detailed(), "binary did not run");
    }

    let raw = fs::read(&scratch.output).map_err(|e| HarnessError::artifact(&scratch.output, e))?;
    let raw = String::from_utf8_lossy(&raw);
    let actual = normalize_output(&raw);

    if actual == fixture.expected {
        remove_if_present(&scratch.input);
        remove_if_present(&scratch.output);
        return Ok(Comparison::Match);
    }

    debug!(fixture = %fixture.path.display(), "output mismatch");
    let snapshot = format!("{}\n", fixture.expected);
    fs::write(&scratch.expected, &snapshot)
        .map_err(|e| HarnessError::artifact(&scratch.expected, e))?;
    let diff = unified_diff(
        &scratch.expected.display().to_string(),
        &snapshot,
        &scratch.output.display().to_string(),
        &raw,
    );
    fs::write(&scratch.diff, diff).map_err(|e| HarnessError::artifact(&scratch.diff, e))?;
    Ok(Comparison::Mismatch)
}

/// Trims captured output and drops every carriage return.
pub fn normalize_output(raw: &str) -> String {
    trim_section(raw).replace('\r', "")
}

fn remove_if_present(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => warn!(path = %path.display(), error = %e, "could not remove artifact"),
    }
}
