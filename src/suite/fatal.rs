//! Tests for `fatal_error`.

use super::{expect_exit_code, expect_output, expect_silent, run_uproc, SuiteTest};
use crate::errors::Stream;
use crate::harness::TestToken;
use crate::utils::{fatal_error, ERROR_MESSAGE_MAX_LENGTH, ERROR_PREFIX};
use tracing::warn;

/// Exit codes probed by `test_fatal_error_code`.
const PROBED_EXIT_CODES: [i32; 7] = [0, 1, 2, 42, 127, 254, 255];

struct FatalParams {
    code: i32,
    message: String,
}

fn fatal_error_uproc(params: FatalParams) {
    fatal_error(params.code, &params.message)
}

/// fatal_error writes the prefixed message to stderr and nothing to stdout.
pub(super) fn test_fatal_error_correct_message() -> bool {
    let test = SuiteTest::FatalErrorCorrectMessage;
    let message = "Something went terribly wrong";
    let params = FatalParams {
        code: 1,
        message: message.to_string(),
    };
    let Some(status) = run_uproc(test, fatal_error_uproc, params) else {
        return false;
    };

    let expected = format!("{}{}", ERROR_PREFIX, message);
    expect_exit_code(test, &status, 1)
        & expect_output(test, Stream::Stderr, expected.as_bytes(), status.stderr.as_deref())
        & expect_silent(test, Stream::Stdout, status.stdout.as_deref())
}

/// fatal_error exits with exactly the code it was given.
pub(super) fn test_fatal_error_code() -> bool {
    let test = SuiteTest::FatalErrorCode;
    PROBED_EXIT_CODES.iter().all(|&code| {
        let params = FatalParams {
            code,
            message: format!("exiting with {}", code),
        };
        match run_uproc(test, fatal_error_uproc, params) {
            Some(status) => expect_exit_code(test, &status, code),
            None => false,
        }
    })
}

/// fatal_error truncates an overlong message to the maximum report length.
pub(super) fn test_fatal_error_message_max() -> bool {
    let test = SuiteTest::FatalErrorMessageMax;
    let params = FatalParams {
        code: 1,
        message: "A".repeat(ERROR_MESSAGE_MAX_LENGTH * 2),
    };
    let Some(status) = run_uproc(test, fatal_error_uproc, params) else {
        return false;
    };

    let stderr = status.stderr.as_deref().unwrap_or_default();
    let mut passed = expect_silent(test, Stream::Stdout, status.stdout.as_deref());
    if stderr.len() != ERROR_MESSAGE_MAX_LENGTH - 1 {
        warn!(test = test.name(), len = stderr.len(), "fatal report has the wrong length");
        passed = false;
    }
    if !stderr.starts_with(ERROR_PREFIX.as_bytes()) {
        warn!(test = test.name(), "fatal report is missing its prefix");
        passed = false;
    }
    passed
}
