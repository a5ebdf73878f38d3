//! The runner's progress line versus uproc stdout capture.
//!
//! These checks leave bytes sitting in the process-wide stdout buffer, so
//! they live in their own test binary as a single test: nothing else may
//! write to stdout while a banner is pending. Stdout is pointed at /dev/null
//! meanwhile, so the leftover banners stay out of the test log.

mod common;

use brz::config::{BannerPolicy, UprocConfig};
use brz::harness::{banner_len, Uproc};
use brz::utils::fatal_error;
use common::SilencedStdout;
use std::io::{self, Write};

const TEST_NAME: &str = "test_banner";

fn banner() -> String {
    format!("  Running test {}...", TEST_NAME)
}

/// Leaves the progress line in the stdout buffer, as the runner does under
/// [`BannerPolicy::Strip`].
fn buffer_banner() {
    io::stdout().write_all(banner().as_bytes()).unwrap();
}

/// Completes the pending line, which flushes the banner into /dev/null.
fn finish_line() {
    let mut stdout = io::stdout().lock();
    stdout.write_all(b"\n").unwrap();
    stdout.flush().unwrap();
}

fn echo(text: &str) {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes()).unwrap();
    stdout.flush().unwrap();
}

#[test]
fn test_banner_policies() {
    assert_eq!(banner().len(), banner_len(TEST_NAME));

    let strip = UprocConfig {
        banner: BannerPolicy::Strip,
        ..UprocConfig::default()
    };
    let flush = UprocConfig::default();
    let _silenced = SilencedStdout::new();

    // The child flushes the inherited banner ahead of its own output.
    buffer_banner();
    let status = Uproc::new(&strip)
        .run_named(TEST_NAME, echo, "payload\n")
        .unwrap();
    finish_line();
    assert_eq!(status.exit_code, 0);
    assert_eq!(status.stdout.as_deref(), Some(&b"payload\n"[..]));

    // Nothing but the banner reached the pipe.
    buffer_banner();
    let status = Uproc::new(&strip)
        .run_named(TEST_NAME, |_: ()| fatal_error(2, "quiet"), ())
        .unwrap();
    finish_line();
    assert_eq!(status.exit_code, 2);
    assert_eq!(status.stdout, None);
    assert!(status.stderr.is_some());

    // Flushing before the fork keeps the banner out of the child entirely.
    buffer_banner();
    let status = Uproc::new(&flush)
        .run_named(TEST_NAME, echo, "payload\n")
        .unwrap();
    finish_line();
    assert_eq!(status.stdout.as_deref(), Some(&b"payload\n"[..]));
}
