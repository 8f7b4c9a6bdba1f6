//! Drives a whole run: one target query, then every fixture in order.

use std::io;
use std::path::{Path, PathBuf};

use termcolor::WriteColor;
use tracing::{debug, info, warn};

use crate::cli::output::Console;
use crate::errors::HarnessError;
use crate::executor;
use crate::fixture::Fixture;
use crate::report::{Outcome, RunReport};
use crate::runner::BinaryRunner;

/// Runs `fixtures` sequentially against `runner`, printing progress and the
/// summary to `console`.
///
/// Fails only when the binary cannot report its target; every per-fixture
/// problem ends up in the returned report. Console write errors (a closed pipe
/// on stdout, say) are logged once and the run carries on.
pub fn run<R, W>(
    runner: &R,
    fixtures: &[PathBuf],
    console: &mut Console<W>,
) -> Result<RunReport, HarnessError>
where
    R: BinaryRunner + ?Sized,
    W: WriteColor,
{
    let target = runner.query_target()?;
    info!(%target, fixtures = fixtures.len(), "starting run");

    let mut report = RunReport::default();
    let mut console_ok = true;
    for (i, path) in fixtures.iter().enumerate() {
        let (progress_len, outcome) = match Fixture::parse(path) {
            Err(e) => {
                debug!(error = %e, "malformed fixture");
                (0, malformed(path, e))
            }
            Ok(fixture) => {
                let progress_len = console
                    .begin(i + 1, fixtures.len(), &fixture)
                    .map_err(|e| console_failed(&mut console_ok, e))
                    .unwrap_or(0);
                (progress_len, evaluate(&fixture, &target, runner))
            }
        };
        if let Err(e) = console.finish(progress_len, &outcome) {
            console_failed(&mut console_ok, e);
        }
        report.record(outcome);
    }

    if let Err(e) = console.summary(&report) {
        console_failed(&mut console_ok, e);
    }
    Ok(report)
}

fn console_failed(console_ok: &mut bool, source: io::Error) {
    let error = HarnessError::from(source);
    if std::mem::replace(console_ok, false) {
        warn!(error = %error.detailed(), "console output failed; continuing without it");
    } else {
        debug!(error = %error.detailed(), "console output failed");
    }
}

/// Classifies a parsed fixture, running it only when it applies to `target`.
pub fn evaluate<R: BinaryRunner + ?Sized>(fixture: &Fixture, target: &str, runner: &R) -> Outcome {
    match &fixture.target {
        Some(wanted) if fixture.skipped_on(target) => Outcome::Skipped {
            name: fixture.name.clone(),
            path: fixture.path.clone(),
            target: wanted.clone(),
        },
        _ => executor::execute(fixture, runner),
    }
}

fn malformed(path: &Path, error: HarnessError) -> Outcome {
    let reason = match error {
        HarnessError::MalformedFixture { reason, .. } => reason,
        other => other.detailed(),
    };
    Outcome::Malformed {
        path: path.to_path_buf(),
        reason,
    }
}
