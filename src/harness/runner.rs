//! # Test Runner
//!
//! Walks a [`Registry`] from its first token to the sentinel, runs every test
//! directly in this process and prints the fixed-format progress and summary
//! report. Tests that need isolation create their own uprocs.
//!
//! The progress line `"  Running test {name}..."` has a fixed length that the
//! capture primitive relies on under [`BannerPolicy::Strip`]; see
//! [`banner_len`](super::capture::banner_len).

use super::registry::{Registry, TestRecord, TestToken};
use crate::config::{self, BannerPolicy, HarnessConfig};
use crate::errors::ConfigError;
use serde::Serialize;
use std::io::{self, Write};
use std::panic::{self, AssertUnwindSafe};
use termcolor::{Color, ColorSpec, WriteColor};
use tracing::{info, warn};

/// The banner rule printed around the per-test progress lines.
pub const RULE: &str = "================================================================";

/// The result of one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestOutcome {
    pub name: &'static str,
    pub passed: bool,
}

/// Aggregate of a whole run, in registration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub total: usize,
    pub passes: usize,
    pub failures: usize,
    pub outcomes: Vec<TestOutcome>,
}

impl Summary {
    pub fn from_outcomes(outcomes: Vec<TestOutcome>) -> Self {
        let passes = outcomes.iter().filter(|o| o.passed).count();
        Self {
            total: outcomes.len(),
            passes,
            failures: outcomes.len() - passes,
            outcomes,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failures == 0
    }

    /// Names of the failed tests, in registration order.
    pub fn failed_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.outcomes.iter().filter(|o| !o.passed).map(|o| o.name)
    }

    /// Process exit status for this run. Without `strict` a run always exits
    /// 0, failures included.
    pub fn exit_code(&self, strict: bool) -> i32 {
        if strict && !self.all_passed() {
            1
        } else {
            0
        }
    }

    /// Writes the totals and either the failure list or the success line.
    pub fn report<W: Write + ?Sized>(&self, out: &mut W) -> io::Result<()> {
        write!(out, "\nSummary of {} total tests run:\n", self.total)?;
        write!(out, "\tPasses: {}, Failures: {}\n", self.passes, self.failures)?;

        if self.all_passed() {
            write!(out, "\nAll unit tests passed :)\n")?;
        } else {
            write!(out, "\nFailed Tests:\n")?;
            for name in self.failed_names() {
                write!(out, "  - {}()\n", name)?;
            }
        }
        Ok(())
    }
}

/// Runs every test of one registry.
pub struct Runner<'a, T> {
    registry: &'a Registry<T>,
    banner: BannerPolicy,
}

impl<'a, T: TestToken> Runner<'a, T> {
    /// A runner using the installed banner policy, the same one
    /// [`create_uproc`](super::uproc::create_uproc) strips by.
    pub fn new(registry: &'a Registry<T>) -> Self {
        Self {
            registry,
            banner: config::current().banner(),
        }
    }

    /// A runner for an explicit configuration. Its banner policy must match
    /// the installed one, otherwise uprocs would strip the wrong prefix.
    pub fn with_config(registry: &'a Registry<T>, config: &HarnessConfig) -> Result<Self, ConfigError> {
        let installed = config::current().banner();
        if config.banner() != installed {
            return Err(ConfigError::BannerMismatch {
                runner: config.banner(),
                installed,
            });
        }
        Ok(Self {
            registry,
            banner: installed,
        })
    }

    /// Runs all tests in token order, writing progress and the summary to `out`.
    pub fn run_all<W: WriteColor>(&self, out: &mut W) -> io::Result<Summary> {
        writeln!(out, "{}", RULE)?;
        writeln!(out, "Starting unit tests:")?;

        let outcomes = self
            .registry
            .iter()
            .map(|record| self.run_one(record, out))
            .collect::<io::Result<Vec<_>>>()?;
        let summary = Summary::from_outcomes(outcomes);

        writeln!(out, "{}", RULE)?;
        summary.report(out)?;
        out.flush()?;

        info!(
            total = summary.total,
            passes = summary.passes,
            failures = summary.failures,
            "unit test run complete"
        );
        Ok(summary)
    }

    fn run_one<W: WriteColor>(&self, record: &TestRecord<T>, out: &mut W) -> io::Result<TestOutcome> {
        write!(out, "  Running test {}...", record.name)?;
        if self.banner == BannerPolicy::Flush {
            out.flush()?;
        }

        let passed = invoke(record);

        let (color, verdict) = if passed {
            (Color::Green, "test passed!")
        } else {
            (Color::Red, "test failed!")
        };
        write!(out, "  ")?;
        out.set_color(ColorSpec::new().set_fg(Some(color)))?;
        write!(out, "{}", verdict)?;
        out.reset()?;
        writeln!(out)?;

        Ok(TestOutcome {
            name: record.name,
            passed,
        })
    }
}

/// Calls a test function; a panic counts as a failure.
fn invoke<T: TestToken>(record: &TestRecord<T>) -> bool {
    let function = record.function;
    match panic::catch_unwind(AssertUnwindSafe(function)) {
        Ok(passed) => passed,
        Err(_) => {
            warn!(test = record.name, "test panicked");
            false
        }
    }
}
