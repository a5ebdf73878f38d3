//! brz: personal utility functions and the process-isolated unit-test
//! harness that verifies them.
//!
//! The harness runs each registered test in order. Tests whose subject exits
//! the process or writes to the console run that code in a forked "uproc" and
//! inspect its exit code and captured output.

pub use crate::errors::{ConfigError, HarnessError, HarnessResult, RegistryError, Stream};

pub mod cli;
pub mod config;
pub mod errors;
pub mod harness;
pub mod suite;
pub mod utils;
