//! Tests for `safe_malloc`.

use super::{expect_exit_code, expect_output, run_uproc, SuiteTest};
use crate::errors::Stream;
use crate::utils::{safe_malloc, ALLOCATION_FAILED, ERROR_PREFIX};

/// Allocation succeeds and has the requested length in the normal case.
pub(super) fn test_safe_malloc() -> bool {
    let size = 50;
    safe_malloc(size).len() == size
}

/// Fresh allocations are zeroed.
pub(super) fn test_safe_malloc_zeros() -> bool {
    [1, 16, 4096, 1 << 20]
        .into_iter()
        .all(|size| safe_malloc(size).iter().all(|&byte| byte == 0))
}

/// An unsatisfiable allocation exits through fatal_error with code -1.
pub(super) fn test_safe_malloc_fails() -> bool {
    let test = SuiteTest::SafeMallocFails;
    let Some(status) = run_uproc(
        test,
        |size: usize| {
            safe_malloc(size);
        },
        usize::MAX,
    ) else {
        return false;
    };

    let expected = format!("{}{}", ERROR_PREFIX, ALLOCATION_FAILED);
    // -1 is observed as 255 once it has been through the exit status.
    expect_exit_code(test, &status, 255)
        & expect_output(test, Stream::Stderr, expected.as_bytes(), status.stderr.as_deref())
}
