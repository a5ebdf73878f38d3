//! A full run under an installed `Strip` policy.
//!
//! Installing a configuration is process-wide, so this binary holds a single
//! test. The report goes to the real stdout (silenced) because the stripped
//! banner must be the one the child inherits.

mod common;

use brz::config::{self, BannerPolicy, HarnessConfig};
use brz::harness::{create_uproc, Registry, Runner};
use brz::ConfigError;
use common::SilencedStdout;
use std::io::{self, Write};
use termcolor::NoColor;

const PAYLOAD: &str = "0123456789abcdefghijklmnopqrstuvwxyz0123456789\n";

fn echo(text: &str) {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes()).unwrap();
    stdout.flush().unwrap();
}

fn test_echo() -> bool {
    match create_uproc(Echo::Payload, echo, PAYLOAD) {
        Ok(status) => status.stdout.as_deref() == Some(PAYLOAD.as_bytes()),
        Err(_) => false,
    }
}

brz::unit_tests! {
    enum Echo {
        Payload => test_echo,
    }
}

#[test]
fn test_runner_follows_installed_strip_policy() {
    let mut strip = HarnessConfig::default();
    strip.uproc.banner = BannerPolicy::Strip;
    config::install(strip).unwrap();

    let registry = Registry::<Echo>::build().unwrap();

    // A runner configured differently from the installed policy is refused.
    let err = Runner::with_config(&registry, &HarnessConfig::default()).err();
    assert_eq!(
        err,
        Some(ConfigError::BannerMismatch {
            runner: BannerPolicy::Flush,
            installed: BannerPolicy::Strip,
        })
    );

    let summary = {
        let _silenced = SilencedStdout::new();
        let mut out = NoColor::new(io::stdout());
        Runner::new(&registry).run_all(&mut out).unwrap()
    };
    assert_eq!(summary.passes, 1, "captured output lost bytes to banner stripping");
    assert_eq!(summary.failures, 0);
}
