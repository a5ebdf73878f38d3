//! brz error types.
//!
//! Every failure the harness can observe is one of three enums:
//! - [`HarnessError`]: the isolated execution primitive could not produce a result.
//! - [`RegistryError`]: a test table was built out of order.
//! - [`ConfigError`]: a configuration value could not be parsed.
//!
//! None of them is process-fatal. A test that receives a [`HarnessError`] reports
//! itself as failed and the run continues.

use crate::config::BannerPolicy;
use miette::Diagnostic;
use std::fmt;
use std::io;
use thiserror::Error;

/// Result alias for harness operations.
pub type HarnessResult<T> = Result<T, HarnessError>;

// ============================================================================
// CAPTURED STREAMS
// ============================================================================

/// One of the two captured standard streams of a uproc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stream::Stdout => "stdout",
            Stream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Stream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// HARNESS ERRORS
// ============================================================================

/// Failures of the isolated execution primitive.
///
/// These describe the harness, not the code under test: a child that exits
/// with a non-zero code is a normal [`crate::harness::UprocStatus`], while a
/// child killed by a signal is [`HarnessError::AbnormalExit`].
#[derive(Error, Diagnostic, Debug)]
pub enum HarnessError {
    #[error("failed to create {stream} pipe")]
    #[diagnostic(code(brz::uproc::pipe), help("the process may have run out of file descriptors"))]
    Pipe {
        stream: Stream,
        #[source]
        source: io::Error,
    },

    #[error("failed to fork uproc for `{test_name}`")]
    #[diagnostic(code(brz::uproc::spawn))]
    Spawn {
        test_name: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("waiting for uproc {pid} failed")]
    #[diagnostic(code(brz::uproc::wait))]
    Wait {
        pid: i32,
        #[source]
        source: io::Error,
    },

    #[error("uproc {pid} did not exit normally (raw status {status:#x})")]
    #[diagnostic(code(brz::uproc::abnormal_exit))]
    AbnormalExit {
        pid: i32,
        status: i32,
        #[help]
        signal: Option<String>,
    },

    #[error("waiting for uproc {stream} to become readable failed")]
    #[diagnostic(code(brz::uproc::ready))]
    Ready {
        stream: Stream,
        #[source]
        source: io::Error,
    },

    #[error("uproc {stream} readiness wait was interrupted {attempts} times")]
    #[diagnostic(code(brz::uproc::ready_interrupted))]
    ReadyInterrupted { stream: Stream, attempts: u32 },

    #[error("reading uproc {stream} failed")]
    #[diagnostic(code(brz::uproc::read))]
    Read {
        stream: Stream,
        #[source]
        source: io::Error,
    },
}

impl HarnessError {
    /// Builds an [`HarnessError::AbnormalExit`] from a raw `waitpid` status.
    pub(crate) fn abnormal_exit(pid: i32, status: i32) -> Self {
        let signal = if libc::WIFSIGNALED(status) {
            Some(format!("terminated by signal {}", libc::WTERMSIG(status)))
        } else {
            None
        };
        HarnessError::AbnormalExit { pid, status, signal }
    }

    /// The signal that killed the child, if that is why it failed.
    pub fn signal(&self) -> Option<i32> {
        match self {
            HarnessError::AbnormalExit { status, .. } if libc::WIFSIGNALED(*status) => {
                Some(libc::WTERMSIG(*status))
            }
            _ => None,
        }
    }
}

// ============================================================================
// REGISTRY ERRORS
// ============================================================================

/// Construction-time violations of the test table layout.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("test `{name}` is listed at position {position} but its token has offset {offset}")]
    #[diagnostic(
        code(brz::registry::misordered),
        help("records must be listed in token order with no gaps")
    )]
    Misordered {
        name: &'static str,
        position: usize,
        offset: usize,
    },

    #[error("expected {expected} test records, found {found}")]
    #[diagnostic(code(brz::registry::count_mismatch))]
    CountMismatch { expected: usize, found: usize },
}

// ============================================================================
// CONFIG ERRORS
// ============================================================================

/// A configuration value that could not be interpreted.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value `{value}` for {var}: {reason}")]
    #[diagnostic(code(brz::config::invalid_value))]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("runner banner policy `{runner}` differs from the installed `{installed}` policy")]
    #[diagnostic(
        code(brz::config::banner_mismatch),
        help("build the runner from the installed configuration")
    )]
    BannerMismatch {
        runner: BannerPolicy,
        installed: BannerPolicy,
    },

    #[error("harness configuration was already installed")]
    #[diagnostic(code(brz::config::already_installed))]
    AlreadyInstalled,
}
