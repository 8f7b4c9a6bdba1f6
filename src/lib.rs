//! Fixture driver for the IR compiler.
//!
//! Discovers `.irt` fixtures, runs each one through the `ir` binary and
//! compares the captured output with the fixture's expectation.

pub use crate::errors::{ErrorType, HarnessError};
pub use crate::fixture::Fixture;
pub use crate::report::{Outcome, OutcomeKind, RunReport};
pub use crate::runner::{BinaryRunner, ProcessRunner};

pub mod cli;
pub mod config;
pub mod coordinator;
pub mod diff;
pub mod discovery;
pub mod errors;
pub mod executor;
pub mod fixture;
pub mod report;
pub mod runner;
