//! The `ir-test` command-line interface.
//!
//! Resolves flags and environment into a [`RunConfig`], wires the real
//! process runner and a terminal console into the coordinator, and hands the
//! report back to `main` for the exit status.

use clap::Parser;
use termcolor::StandardStream;
use tracing::info;

use crate::cli::args::IrTestArgs;
use crate::cli::output::Console;
use crate::config::RunConfig;
use crate::coordinator;
use crate::discovery::discover_fixtures;
use crate::report::RunReport;
use crate::runner::ProcessRunner;

pub mod args;
pub mod output;

/// The main entry point for the CLI.
pub fn run() -> miette::Result<RunReport> {
    let args = IrTestArgs::parse();
    execute(&RunConfig::from(&args))
}

/// Runs every fixture under `config.test_dir`.
pub fn execute(config: &RunConfig) -> miette::Result<RunReport> {
    info!(binary = %config.binary.display(), tests = %config.test_dir.display(), "configured");
    let runner = ProcessRunner::new(&config.binary).with_timeout(config.timeout);
    let fixtures = discover_fixtures(&config.test_dir);
    let mut console = Console::new(
        StandardStream::stdout(config.color_choice()),
        config.show_diff,
    );
    Ok(coordinator::run(&runner, &fixtures, &mut console)?)
}
