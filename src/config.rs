use std::path::PathBuf;
use std::time::Duration;

use termcolor::ColorChoice;

use crate::cli::args::IrTestArgs;

/// Name of the binary under test inside the build directory.
#[cfg(windows)]
pub const BINARY_NAME: &str = "ir.exe";
#[cfg(not(windows))]
pub const BINARY_NAME: &str = "ir";

/// Fixture directory inside the source tree.
pub const TEST_SUBDIR: &str = "tests";

/// Configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub test_dir: PathBuf,
    pub binary: PathBuf,
    pub show_diff: bool,
    pub use_colors: bool,
    pub timeout: Option<Duration>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            test_dir: PathBuf::from(".").join(TEST_SUBDIR),
            binary: PathBuf::from(".").join(BINARY_NAME),
            show_diff: false,
            use_colors: atty::is(atty::Stream::Stdout),
            timeout: None,
        }
    }
}

impl RunConfig {
    pub fn color_choice(&self) -> ColorChoice {
        if self.use_colors {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        }
    }
}

impl From<&IrTestArgs> for RunConfig {
    fn from(args: &IrTestArgs) -> Self {
        let defaults = RunConfig::default();
        Self {
            test_dir: args
                .test_dir
                .clone()
                .unwrap_or_else(|| args.src_dir.join(TEST_SUBDIR)),
            binary: args
                .binary
                .clone()
                .unwrap_or_else(|| args.build_dir.join(BINARY_NAME)),
            show_diff: args.show_diff,
            use_colors: defaults.use_colors && !args.no_color,
            timeout: args.timeout.filter(|&secs| secs > 0).map(Duration::from_secs),
        }
    }
}
