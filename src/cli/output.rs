//! User-facing output for the CLI beyond the runner's own report.

use crate::harness::{Registry, Summary, TestToken};
use miette::{IntoDiagnostic, WrapErr};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Prints the registered tests, one per line, in run order.
pub fn print_listing<T: TestToken, W: Write>(registry: &Registry<T>, out: &mut W) -> io::Result<()> {
    for (position, record) in registry.iter().enumerate() {
        writeln!(out, "{:>3}  {}", position, record.name)?;
    }
    out.flush()
}

/// Writes `summary` as pretty JSON to `path`.
pub fn write_summary_json(path: &Path, summary: &Summary) -> miette::Result<()> {
    let file = File::create(path)
        .into_diagnostic()
        .wrap_err_with(|| format!("cannot create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, summary)
        .into_diagnostic()
        .wrap_err("cannot serialize the run summary")?;
    writer.flush().into_diagnostic()
}
