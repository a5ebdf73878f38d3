//! Tests for `fbindump`.

use super::{expect_exit_code, expect_output, expect_silent, run_uproc, SuiteTest};
use crate::errors::Stream;
use crate::utils::bindump;
use std::process;

// Chance's verse on "Hello". The two accented vowels are multi-byte in UTF-8.
const MESSAGE: &str = "Hello rap game, nǐ hǎo, how you durrn'? \
                       I done took my time, now it's time to take my turn\r\n";

const INTENDED_OUTPUT: &str = "\
48 65 6c 6c 6f 20 72 61 70 20 67 61 6d 65 2c 20 | Hello rap game, \n\
6e c7 90 20 68 c7 8e 6f 2c 20 68 6f 77 20 79 6f | n.. h..o, how yo\n\
75 20 64 75 72 72 6e 27 3f 20 49 20 64 6f 6e 65 | u durrn'? I done\n\
20 74 6f 6f 6b 20 6d 79 20 74 69 6d 65 2c 20 6e |  took my time, n\n\
6f 77 20 69 74 27 73 20 74 69 6d 65 20 74 6f 20 | ow it's time to \n\
74 61 6b 65 20 6d 79 20 74 75 72 6e 0d 0a       | take my turn..\n";

fn fbindump_uproc(data: &'static [u8]) {
    if bindump(data).is_err() {
        process::exit(1);
    }
}

/// fbindump renders the lyric byte for byte, padding included.
pub(super) fn test_fbindump() -> bool {
    let test = SuiteTest::Fbindump;
    let Some(status) = run_uproc(test, fbindump_uproc, MESSAGE.as_bytes()) else {
        return false;
    };

    expect_exit_code(test, &status, 0)
        & expect_output(test, Stream::Stdout, INTENDED_OUTPUT.as_bytes(), status.stdout.as_deref())
        & expect_silent(test, Stream::Stderr, status.stderr.as_deref())
}
