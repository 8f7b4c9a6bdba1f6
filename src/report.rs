//! Outcomes of individual fixtures and their aggregation over a run.

use std::path::{Path, PathBuf};

/// Final classification of one fixture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Output matched the expectation.
    Passed { name: String, path: PathBuf },
    /// Output differed, or the harness could not complete the comparison.
    Failed {
        name: String,
        path: PathBuf,
        diff: Option<PathBuf>,
        error: Option<String>,
    },
    /// Output differed on a fixture marked `--XFAIL--`.
    ExpectedFailed {
        name: String,
        path: PathBuf,
        reason: String,
        diff: Option<PathBuf>,
    },
    /// The fixture is pinned to a different target.
    Skipped {
        name: String,
        path: PathBuf,
        target: String,
    },
    /// The fixture document could not be parsed.
    Malformed { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeKind {
    Passed,
    Failed,
    ExpectedFailed,
    Skipped,
    Malformed,
}

impl Outcome {
    pub fn kind(&self) -> OutcomeKind {
        match self {
            Outcome::Passed { .. } => OutcomeKind::Passed,
            Outcome::Failed { .. } => OutcomeKind::Failed,
            Outcome::ExpectedFailed { .. } => OutcomeKind::ExpectedFailed,
            Outcome::Skipped { .. } => OutcomeKind::Skipped,
            Outcome::Malformed { .. } => OutcomeKind::Malformed,
        }
    }

    /// Display name; malformed fixtures have none and show their path instead.
    pub fn name(&self) -> String {
        match self {
            Outcome::Passed { name, .. }
            | Outcome::Failed { name, .. }
            | Outcome::ExpectedFailed { name, .. }
            | Outcome::Skipped { name, .. } => name.clone(),
            Outcome::Malformed { path, .. } => path.display().to_string(),
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Outcome::Passed { path, .. }
            | Outcome::Failed { path, .. }
            | Outcome::ExpectedFailed { path, .. }
            | Outcome::Skipped { path, .. }
            | Outcome::Malformed { path, .. } => path,
        }
    }

    /// Diff artifact written for a mismatch, if any.
    pub fn diff_path(&self) -> Option<&Path> {
        match self {
            Outcome::Failed { diff, .. } | Outcome::ExpectedFailed { diff, .. } => diff.as_deref(),
            _ => None,
        }
    }
}

/// Aggregated results of a run.
///
/// Owned by the coordinator loop and updated once per fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    pub total: usize,
    pub passed: usize,
    pub expected_failed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub malformed: usize,
    /// Every non-passing outcome, in execution order.
    pub problems: Vec<Outcome>,
}

impl RunReport {
    pub fn record(&mut self, outcome: Outcome) {
        self.total += 1;
        match outcome.kind() {
            OutcomeKind::Passed => {
                self.passed += 1;
                return;
            }
            OutcomeKind::Failed => self.failed += 1,
            OutcomeKind::ExpectedFailed => self.expected_failed += 1,
            OutcomeKind::Skipped => self.skipped += 1,
            OutcomeKind::Malformed => self.malformed += 1,
        }
        self.problems.push(outcome);
    }

    /// Non-passing outcomes of one kind, in execution order.
    pub fn of_kind(&self, kind: OutcomeKind) -> impl Iterator<Item = &Outcome> {
        self.problems.iter().filter(move |o| o.kind() == kind)
    }

    /// Only genuine failures fail the run.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_failures())
    }
}
