//! Hex/ASCII dumps of byte slices.
//!
//! ```text
//! 48 65 6c 6c 6f 20 72 61 70 20 67 61 6d 65 2c 20 | Hello rap game, 
//! 74 61 6b 65 0d 0a                               | take..
//! ```

use std::io::{self, Write};

pub const BYTES_PER_LINE: usize = 16;

/// Writes a dump of `data` to `out`: sixteen bytes per line as lowercase hex,
/// a `"| "` separator, then the printable-ASCII rendering of the same bytes.
/// Short final lines are padded so the separators line up.
pub fn fbindump<W: Write + ?Sized>(out: &mut W, data: &[u8]) -> io::Result<()> {
    for line in data.chunks(BYTES_PER_LINE) {
        let mut text = String::with_capacity(BYTES_PER_LINE * 4 + 3);
        for byte in line {
            text.push_str(&format!("{:02x} ", byte));
        }
        for _ in line.len()..BYTES_PER_LINE {
            text.push_str("   ");
        }
        text.push_str("| ");
        text.extend(line.iter().map(|&b| printable(b)));
        text.push('\n');
        out.write_all(text.as_bytes())?;
    }
    Ok(())
}

/// Writes a dump of `data` to stdout.
pub fn bindump(data: &[u8]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    fbindump(&mut out, data)?;
    out.flush()
}

fn printable(byte: u8) -> char {
    if (32..=126).contains(&byte) {
        byte as char
    } else {
        '.'
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dump(data: &[u8]) -> String {
        let mut out = Vec::new();
        fbindump(&mut out, data).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_full_line() {
        assert_eq!(
            dump(b"0123456789abcdef"),
            "30 31 32 33 34 35 36 37 38 39 61 62 63 64 65 66 | 0123456789abcdef\n"
        );
    }

    #[test]
    fn test_short_line_is_padded() {
        let expected = format!("41 00 7f {}| A..\n", "   ".repeat(13));
        assert_eq!(dump(&[0x41, 0x00, 0x7f]), expected);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(dump(&[]), "");
    }
}
