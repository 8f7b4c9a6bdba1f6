//! Error handling for the fixture driver.
//!
//! Every per-fixture failure is represented here and later folded into an
//! [`Outcome`](crate::report::Outcome), so a single broken fixture never stops
//! the batch. Only [`HarnessError::TargetQuery`] is fatal to a run; a broken
//! console is logged and the run continues.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Type-safe classification of [`HarnessError`] variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorType {
    /// The fixture document could not be parsed.
    Malformed,
    /// A scratch artifact could not be written or read.
    ArtifactIo,
    /// The binary could not be started for a fixture.
    Launch,
    /// The binary could not report its target.
    TargetQuery,
    /// Progress or summary output could not be written.
    Console,
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::Malformed => "Malformed",
            ErrorType::ArtifactIo => "ArtifactIo",
            ErrorType::Launch => "Launch",
            ErrorType::TargetQuery => "TargetQuery",
            ErrorType::Console => "Console",
        }
    }
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Unified error type for all failure modes of a test run.
#[derive(Debug, Error, Diagnostic)]
pub enum HarnessError {
    #[error("malformed fixture '{}': {reason}", .path.display())]
    #[diagnostic(
        code(ir_test::malformed),
        help("a fixture needs --TEST--, --CODE-- and --EXPECT-- sections")
    )]
    MalformedFixture { path: PathBuf, reason: String },

    #[error("cannot access artifact '{}'", .path.display())]
    #[diagnostic(code(ir_test::artifact_io))]
    ArtifactIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to launch '{}'", .binary.display())]
    #[diagnostic(code(ir_test::launch))]
    SubprocessLaunch {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not query the target of '{}'", .binary.display())]
    #[diagnostic(
        code(ir_test::target_query),
        help("set BUILD_DIR to the directory containing the ir binary, or pass --binary")
    )]
    TargetQuery {
        binary: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write run output")]
    #[diagnostic(code(ir_test::console))]
    Console {
        #[from]
        source: std::io::Error,
    },
}

impl HarnessError {
    /// Returns the classification of this error.
    pub fn error_type(&self) -> ErrorType {
        match self {
            HarnessError::MalformedFixture { .. } => ErrorType::Malformed,
            HarnessError::ArtifactIo { .. } => ErrorType::ArtifactIo,
            HarnessError::SubprocessLaunch { .. } => ErrorType::Launch,
            HarnessError::TargetQuery { .. } => ErrorType::TargetQuery,
            HarnessError::Console { .. } => ErrorType::Console,
        }
    }

    pub(crate) fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        HarnessError::MalformedFixture {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn artifact(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarnessError::ArtifactIo {
            path: path.into(),
            source,
        }
    }

    /// Message including the underlying cause, used in failure listings.
    pub fn detailed(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("{}: {}", self, cause),
            None => self.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detailed_message_includes_io_cause() {
        let err = HarnessError::artifact(
            "t/a.out",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.error_type(), ErrorType::ArtifactIo);
        assert_eq!(err.detailed(), "cannot access artifact 't/a.out': gone");
    }

    #[test]
    fn malformed_has_no_cause() {
        let err = HarnessError::malformed("x.irt", "missing --EXPECT-- section");
        assert_eq!(err.error_type().to_string(), "Malformed");
        assert_eq!(
            err.detailed(),
            "malformed fixture 'x.irt': missing --EXPECT-- section"
        );
    }
}
