// Properties of the utility functions that do not need a child process.

use brz::utils::{
    fbindump, format_fatal_message, safe_calloc, safe_malloc, BYTES_PER_LINE, ERROR_MESSAGE_MAX_LENGTH,
    ERROR_PREFIX,
};
use proptest::prelude::*;

const LYRIC: &str = "Hello rap game, nǐ hǎo, how you durrn'? \
                     I done took my time, now it's time to take my turn\r\n";

#[test]
fn test_fbindump_lyric() {
    let mut out = Vec::new();
    fbindump(&mut out, LYRIC.as_bytes()).unwrap();
    let dump = String::from_utf8(out).unwrap();
    let lines: Vec<_> = dump.lines().collect();

    assert_eq!(LYRIC.len(), 94);
    assert_eq!(lines.len(), 6);
    assert_eq!(lines[1], "6e c7 90 20 68 c7 8e 6f 2c 20 68 6f 77 20 79 6f | n.. h..o, how yo");
    assert_eq!(lines[5], "74 61 6b 65 20 6d 79 20 74 75 72 6e 0d 0a       | take my turn..");
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_safe_malloc_is_zero_filled(size in 1usize..100_000) {
        let block = safe_malloc(size);
        prop_assert_eq!(block.len(), size);
        prop_assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_safe_calloc_covers_count_times_size(count in 0usize..512, size in 0usize..512) {
        let block = safe_calloc(count, size);
        prop_assert_eq!(block.len(), count * size);
        prop_assert!(block.iter().all(|&b| b == 0));
    }

    #[test]
    fn prop_fatal_message_is_bounded(message in "[ -~]{0,2048}") {
        let report = format_fatal_message(&message);
        let budget = ERROR_MESSAGE_MAX_LENGTH - ERROR_PREFIX.len() - 1;
        prop_assert!(report.len() < ERROR_MESSAGE_MAX_LENGTH);
        prop_assert!(report.starts_with(ERROR_PREFIX.as_bytes()));
        prop_assert_eq!(report.len(), ERROR_PREFIX.len() + message.len().min(budget));
        prop_assert!(message.as_bytes().starts_with(&report[ERROR_PREFIX.len()..]));
    }

    #[test]
    fn prop_fbindump_line_shape(data in proptest::collection::vec(any::<u8>(), 0..200)) {
        let mut out = Vec::new();
        fbindump(&mut out, &data).unwrap();
        let dump = String::from_utf8(out).unwrap();

        prop_assert_eq!(dump.lines().count(), data.len().div_ceil(BYTES_PER_LINE));
        for (line, chunk) in dump.lines().zip(data.chunks(BYTES_PER_LINE)) {
            prop_assert_eq!(&line[BYTES_PER_LINE * 3..BYTES_PER_LINE * 3 + 2], "| ");
            prop_assert_eq!(line.len(), BYTES_PER_LINE * 3 + 2 + chunk.len());
        }
    }
}
