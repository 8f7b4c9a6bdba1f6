//! Defines the command-line arguments of `ir-test`.
//!
//! Every path option can also come from the environment, so the runner can be
//! driven from a build system without extra flags.

use clap::Parser;
use std::path::PathBuf;

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "ir-test",
    version,
    about = "Runs .irt fixtures against the ir binary and compares their output."
)]
pub struct IrTestArgs {
    /// Print the diff of every failing fixture.
    #[arg(long)]
    pub show_diff: bool,

    /// Disable colored status output.
    #[arg(long)]
    pub no_color: bool,

    /// Directory containing the ir binary.
    #[arg(long, env = "BUILD_DIR", default_value = ".")]
    pub build_dir: PathBuf,

    /// Source tree whose `tests` directory holds the fixtures.
    #[arg(long, env = "SRC_DIR", default_value = ".")]
    pub src_dir: PathBuf,

    /// Fixture directory, overriding `<src-dir>/tests`.
    #[arg(long)]
    pub test_dir: Option<PathBuf>,

    /// Binary under test, overriding `<build-dir>/ir`.
    #[arg(long)]
    pub binary: Option<PathBuf>,

    /// Kill a fixture's process after this many seconds.
    #[arg(long, env = "IR_TEST_TIMEOUT", value_name = "SECS")]
    pub timeout: Option<u64>,
}
