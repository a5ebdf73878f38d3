//! Process-isolated unit-test harness.
//!
//! - [`registry`]: token → test table.
//! - [`runner`]: runs a registry and prints the report.
//! - [`uproc`]: runs a function in a child process and captures its output.
//! - [`capture`]: the fixed-capacity buffers uproc output lands in.

pub mod capture;
pub mod registry;
pub mod runner;
pub mod uproc;

pub use capture::{banner_len, CaptureBuffer, UPROC_OUTPUT_MAX_LEN};
pub use registry::{Registry, TestFn, TestRecord, TestToken};
pub use runner::{Runner, Summary, TestOutcome};
pub use uproc::{create_uproc, Uproc, UprocStatus};
