//! Tests for `safe_calloc`.

use super::{expect_exit_code, expect_output, run_uproc, SuiteTest};
use crate::errors::Stream;
use crate::utils::{safe_calloc, ALLOCATION_FAILED, ERROR_PREFIX};

/// Contiguous allocation succeeds and is zeroed in the normal case.
pub(super) fn test_safe_calloc() -> bool {
    let (count, size) = (10, 50);
    let segment = safe_calloc(count, size);
    segment.len() == count * size && segment.iter().all(|&byte| byte == 0)
}

/// An overflowing element count is fatal.
pub(super) fn test_safe_calloc_fails() -> bool {
    let test = SuiteTest::SafeCallocFails;
    let Some(status) = run_uproc(
        test,
        |(count, size): (usize, usize)| {
            safe_calloc(count, size);
        },
        (usize::MAX, 2),
    ) else {
        return false;
    };

    let expected = format!("{}{}", ERROR_PREFIX, ALLOCATION_FAILED);
    expect_exit_code(test, &status, 255)
        & expect_output(test, Stream::Stderr, expected.as_bytes(), status.stderr.as_deref())
}
