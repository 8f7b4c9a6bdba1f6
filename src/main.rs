//! `ir-test` entry point.

use std::process;

fn main() -> miette::Result<()> {
    // Logs go to stderr so they never tear the progress lines on stdout.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let report = ir_test::cli::run()?;
    if report.has_failures() {
        process::exit(1);
    }
    Ok(())
}
