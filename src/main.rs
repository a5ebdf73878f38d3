//! brz unit-test runner entry point.

use std::process;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    // Logs go to stderr so stdout carries only the test report.
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::try_from_env("BRZ_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();

    let code = brz::cli::run()?;
    if code != 0 {
        process::exit(code);
    }
    Ok(())
}
