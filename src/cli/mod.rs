//! The brz command-line interface.
//!
//! Assembles the configuration, installs it, builds the suite's registry and
//! hands it to the runner.

use crate::config::{self, HarnessConfig};
use crate::harness::Runner;
use crate::suite;
use args::BrzArgs;
use clap::Parser;
use miette::IntoDiagnostic;
use std::io;
use termcolor::StandardStream;
use tracing::debug;

pub mod args;
pub mod output;

/// The main entry point for the CLI. Returns the process exit status.
pub fn run() -> miette::Result<i32> {
    let args = BrzArgs::parse();

    let mut config = HarnessConfig::from_env()?;
    args.apply(&mut config);
    let config = config::install(config)?;
    debug!(?config, "harness configured");

    let registry = suite::registry()?;

    if args.list {
        let stdout = io::stdout();
        output::print_listing(&registry, &mut stdout.lock()).into_diagnostic()?;
        return Ok(0);
    }

    let mut stdout = StandardStream::stdout(args.color.choice());
    let summary = Runner::new(&registry)
        .run_all(&mut stdout)
        .into_diagnostic()?;

    if let Some(path) = &args.summary_json {
        output::write_summary_json(path, &summary)?;
    }

    Ok(summary.exit_code(config.strict_exit))
}
