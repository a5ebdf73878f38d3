//! Fatal-exit reporting.

use std::io::{self, Write};
use std::process;

/// Upper bound on a fatal report, counting the prefix and one byte of slack
/// for a terminator, so at most `ERROR_MESSAGE_MAX_LENGTH - 1` bytes are written.
pub const ERROR_MESSAGE_MAX_LENGTH: usize = 1024;

pub const ERROR_PREFIX: &str = "[!!] Fatal Error: ";

/// Writes `"[!!] Fatal Error: " + message` to stderr and exits with `exit_value`.
///
/// The message is cut to `ERROR_MESSAGE_MAX_LENGTH - (prefix length + 1)` bytes.
/// No newline is appended.
pub fn fatal_error(exit_value: i32, message: &str) -> ! {
    let report = format_fatal_message(message);
    let mut stderr = io::stderr().lock();
    let _ = stderr.write_all(&report);
    let _ = stderr.flush();
    process::exit(exit_value)
}

/// The exact bytes [`fatal_error`] writes for `message`.
pub fn format_fatal_message(message: &str) -> Vec<u8> {
    let budget = ERROR_MESSAGE_MAX_LENGTH - (ERROR_PREFIX.len() + 1);
    let message = message.as_bytes();
    let kept = &message[..message.len().min(budget)];

    let mut report = Vec::with_capacity(ERROR_PREFIX.len() + kept.len());
    report.extend_from_slice(ERROR_PREFIX.as_bytes());
    report.extend_from_slice(kept);
    report
}
