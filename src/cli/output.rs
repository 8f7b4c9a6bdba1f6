//! Handles all user-facing output of a run.
//!
//! Progress lines, per-fixture status lines, inline diffs and the final
//! summary are all written through [`Console`], so every run looks the same
//! whether it goes to a terminal or into a buffer under test.

use std::fs;
use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};

use crate::fixture::Fixture;
use crate::report::{Outcome, OutcomeKind, RunReport};

const SEPARATOR_WIDTH: usize = 32;

/// Writes run output to any color-capable sink.
pub struct Console<W: WriteColor> {
    out: W,
    show_diff: bool,
}

impl<W: WriteColor> Console<W> {
    pub fn new(out: W, show_diff: bool) -> Self {
        Self { out, show_diff }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Prints the transient `TEST: i/N` line for a fixture about to run.
    ///
    /// Returns its length so [`Console::finish`] can blank it out.
    pub fn begin(&mut self, index: usize, total: usize, fixture: &Fixture) -> io::Result<usize> {
        let line = format!(
            "TEST: {}/{} {}[{}]",
            index,
            total,
            fixture.name,
            fixture.path.display()
        );
        write!(self.out, "{}\r", line)?;
        self.out.flush()?;
        Ok(line.len() + 1)
    }

    /// Replaces the progress line with the final status line of `outcome`.
    pub fn finish(&mut self, progress_len: usize, outcome: &Outcome) -> io::Result<()> {
        if progress_len > 0 {
            write!(self.out, "{}\r", " ".repeat(progress_len))?;
        }

        let (label, color) = status_label(outcome.kind());
        self.colored(label, color)?;
        match outcome {
            Outcome::Malformed { path, .. } => writeln!(self.out, ": [{}]", path.display())?,
            Outcome::ExpectedFailed { reason, .. } => writeln!(
                self.out,
                ": {} [{}]  XFAIL REASON: {}",
                outcome.name(),
                outcome.path().display(),
                reason
            )?,
            _ => writeln!(
                self.out,
                ": {} [{}]",
                outcome.name(),
                outcome.path().display()
            )?,
        }

        if let Outcome::Failed { diff, error, .. } = outcome {
            if let Some(error) = error {
                writeln!(self.out, "  Error: {}", error)?;
            }
            if let (true, Some(diff)) = (self.show_diff, diff) {
                match fs::read_to_string(diff) {
                    Ok(text) => self.print_diff(&text)?,
                    Err(e) => writeln!(self.out, "  Couldn't read '{}': {}", diff.display(), e)?,
                }
            }
        }
        self.out.flush()
    }

    /// Prints the end-of-run summary.
    pub fn summary(&mut self, report: &RunReport) -> io::Result<()> {
        self.separator()?;
        writeln!(self.out, "Test Summary")?;
        self.separator()?;
        if report.malformed > 0 {
            writeln!(self.out, "Bad tests: {}", report.malformed)?;
            self.separator()?;
            for outcome in report.of_kind(OutcomeKind::Malformed) {
                writeln!(self.out, "{}", outcome.path().display())?;
            }
            self.separator()?;
        }
        writeln!(self.out, "Total: {}", report.total)?;
        writeln!(self.out, "Passed: {}", report.passed)?;
        writeln!(self.out, "Expected fail: {}", report.expected_failed)?;
        writeln!(self.out, "Failed: {}", report.failed)?;
        writeln!(self.out, "Skipped: {}", report.skipped)?;

        if report.expected_failed > 0 {
            self.separator()?;
            writeln!(self.out, "EXPECTED FAILED TESTS")?;
            self.separator()?;
            for outcome in report.of_kind(OutcomeKind::ExpectedFailed) {
                if let Outcome::ExpectedFailed { name, path, reason, .. } = outcome {
                    writeln!(
                        self.out,
                        "{} [{}]  XFAIL REASON: {}",
                        name,
                        path.display(),
                        reason
                    )?;
                }
            }
        }
        if report.failed > 0 {
            self.separator()?;
            writeln!(self.out, "FAILED TESTS")?;
            self.separator()?;
            for outcome in report.of_kind(OutcomeKind::Failed) {
                writeln!(self.out, "{} [{}]", outcome.name(), outcome.path().display())?;
            }
        }
        self.separator()?;
        self.out.flush()
    }

    fn separator(&mut self) -> io::Result<()> {
        writeln!(self.out, "{}", "-".repeat(SEPARATOR_WIDTH))
    }

    fn colored(&mut self, text: &str, color: Color) -> io::Result<()> {
        self.out
            .set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
        write!(self.out, "{}", text)?;
        self.out.reset()
    }

    /// Prints a unified diff, coloring removed and added lines.
    fn print_diff(&mut self, diff: &str) -> io::Result<()> {
        for line in diff.lines() {
            let color = match line.chars().next() {
                Some('@') => Some(Color::Cyan),
                Some('-') if !line.starts_with("---") => Some(Color::Red),
                Some('+') if !line.starts_with("+++") => Some(Color::Green),
                _ => None,
            };
            match color {
                Some(color) => {
                    self.out.set_color(ColorSpec::new().set_fg(Some(color)))?;
                    write!(self.out, "{}", line)?;
                    self.out.reset()?;
                    writeln!(self.out)?;
                }
                None => writeln!(self.out, "{}", line)?,
            }
        }
        Ok(())
    }
}

fn status_label(kind: OutcomeKind) -> (&'static str, Color) {
    match kind {
        OutcomeKind::Passed => ("PASS", Color::Green),
        OutcomeKind::Skipped => ("SKIP", Color::Yellow),
        OutcomeKind::ExpectedFailed => ("XFAIL", Color::Red),
        OutcomeKind::Failed => ("FAIL", Color::Red),
        OutcomeKind::Malformed => ("BROK", Color::Red),
    }
}
