//! The brz unit-test suite.
//!
//! To add a test:
//! - write a `fn test_<function>[_<feature>]() -> bool` in the module for the
//!   utility it covers;
//! - add a `Token => test_fn` entry to [`SuiteTest`] below.
//!
//! A test that needs the code under test to exit (or to own stdout/stderr)
//! runs it in a uproc with [`run_uproc`] and inspects the result.

mod calloc;
mod dump;
mod fatal;
mod malloc;

use crate::errors::{RegistryError, Stream};
use crate::harness::{create_uproc, Registry, TestToken, UprocStatus};
use difference::{Changeset, Difference};
use tracing::warn;

use self::calloc::{test_safe_calloc, test_safe_calloc_fails};
use self::dump::test_fbindump;
use self::fatal::{test_fatal_error_code, test_fatal_error_correct_message, test_fatal_error_message_max};
use self::malloc::{test_safe_malloc, test_safe_malloc_fails, test_safe_malloc_zeros};

crate::unit_tests! {
    /// Every test in the brz suite, in run order.
    pub enum SuiteTest {
        RootUnitTest => test_root_unit_test,
        FatalErrorCorrectMessage => test_fatal_error_correct_message,
        FatalErrorCode => test_fatal_error_code,
        FatalErrorMessageMax => test_fatal_error_message_max,
        SafeMalloc => test_safe_malloc,
        SafeMallocZeros => test_safe_malloc_zeros,
        SafeMallocFails => test_safe_malloc_fails,
        SafeCalloc => test_safe_calloc,
        SafeCallocFails => test_safe_calloc_fails,
        Fbindump => test_fbindump,
    }
}

/// The suite's test table.
pub fn registry() -> Result<Registry<SuiteTest>, RegistryError> {
    Registry::build()
}

/// Checks that the harness itself can run a test.
fn test_root_unit_test() -> bool {
    true
}

// ============================================================================
// SHARED HELPERS
// ============================================================================

/// Runs `entry(args)` in a uproc, logging and swallowing harness failures.
fn run_uproc<A, F>(test: SuiteTest, entry: F, args: A) -> Option<UprocStatus>
where
    F: FnOnce(A),
{
    match create_uproc(test, entry, args) {
        Ok(status) => Some(status),
        Err(err) => {
            warn!(test = test.name(), error = %err, "uproc failed");
            None
        }
    }
}

/// Compares captured output with what the test expected, logging a line
/// diff on mismatch.
fn expect_output(test: SuiteTest, stream: Stream, expected: &[u8], actual: Option<&[u8]>) -> bool {
    let actual = actual.unwrap_or_default();
    if expected == actual {
        return true;
    }

    let expected_text = String::from_utf8_lossy(expected);
    let actual_text = String::from_utf8_lossy(actual);
    let changeset = Changeset::new(&expected_text, &actual_text, "\n");
    warn!(
        test = test.name(),
        %stream,
        diff = %render_diff(&changeset.diffs),
        "captured output did not match"
    );
    false
}

/// Expects the stream to be absent.
fn expect_silent(test: SuiteTest, stream: Stream, actual: Option<&[u8]>) -> bool {
    match actual {
        None => true,
        Some(bytes) => {
            warn!(
                test = test.name(),
                %stream,
                output = %String::from_utf8_lossy(bytes),
                "expected no output"
            );
            false
        }
    }
}

fn expect_exit_code(test: SuiteTest, status: &UprocStatus, expected: i32) -> bool {
    if status.exit_code == expected {
        return true;
    }
    warn!(
        test = test.name(),
        expected,
        actual = status.exit_code,
        "unexpected uproc exit code"
    );
    false
}

fn render_diff(diffs: &[Difference]) -> String {
    let mut rendered = String::new();
    for diff in diffs {
        let (marker, text) = match diff {
            Difference::Same(text) => (' ', text),
            Difference::Add(text) => ('+', text),
            Difference::Rem(text) => ('-', text),
        };
        for line in text.lines() {
            rendered.push(marker);
            rendered.push_str(line);
            rendered.push('\n');
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_suite_registry_is_well_formed() {
        let registry = registry().unwrap();
        assert_eq!(registry.len(), SuiteTest::END);
        assert_eq!(SuiteTest::FIRST, SuiteTest::RootUnitTest);
        for &token in SuiteTest::ALL {
            assert_eq!(registry.lookup(token).token, token);
            assert!(registry.name_of(token).starts_with("test_"));
        }
        assert_eq!(registry.name_of(SuiteTest::Fbindump), "test_fbindump");
    }

    #[test]
    #[serial]
    fn test_fatal_error_tests_pass() {
        assert!(test_fatal_error_correct_message());
        assert!(test_fatal_error_code());
        assert!(test_fatal_error_message_max());
    }

    #[test]
    fn test_render_diff_marks_changes() {
        let changeset = Changeset::new("a\nb", "a\nc", "\n");
        let rendered = render_diff(&changeset.diffs);
        assert!(rendered.contains(" a\n"));
        assert!(rendered.contains("-b\n"));
        assert!(rendered.contains("+c\n"));
    }
}
