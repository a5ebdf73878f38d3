//! Capture buffers for uproc output.
//!
//! Each uproc stream is drained with a single best-effort read into a
//! fixed-capacity buffer. Anything the child wrote past the capacity stays in
//! the pipe and is discarded when the pipe is closed. Tests that compare exact
//! output must keep it under [`UPROC_OUTPUT_MAX_LEN`].

use std::io;
use std::os::fd::{AsRawFd, BorrowedFd};

/// Capacity of each per-stream capture buffer.
pub const UPROC_OUTPUT_MAX_LEN: usize = 4096;

/// Length of the fixed part of the runner's progress line:
/// `"  Running test "` (15 bytes) plus the trailing `"..."`.
pub const BANNER_FIXED_LEN: usize = 18;

/// Number of stdout bytes the runner's progress line occupies for `test_name`.
pub fn banner_len(test_name: &str) -> usize {
    BANNER_FIXED_LEN + test_name.len()
}

/// A fixed-capacity byte region holding one stream's captured output.
#[derive(Debug, Clone)]
pub struct CaptureBuffer {
    bytes: Box<[u8]>,
    len: usize,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::with_capacity(UPROC_OUTPUT_MAX_LEN)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: vec![0u8; capacity].into_boxed_slice(),
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }

    /// Appends what fits and silently drops the rest. Returns the number of
    /// bytes kept.
    pub fn extend_truncating(&mut self, data: &[u8]) -> usize {
        let room = self.capacity() - self.len;
        let kept = data.len().min(room);
        self.bytes[self.len..self.len + kept].copy_from_slice(&data[..kept]);
        self.len += kept;
        kept
    }

    /// Performs one `read(2)` from `fd` into the free space of the buffer,
    /// retrying only if the call is interrupted. End of file reads zero bytes.
    pub fn fill_from(&mut self, fd: BorrowedFd<'_>) -> io::Result<usize> {
        let spare = &mut self.bytes[self.len..];
        if spare.is_empty() {
            return Ok(0);
        }
        loop {
            // SAFETY: `spare` is a valid writable region of `spare.len()` bytes
            // and `fd` is borrowed for the duration of the call.
            let n = unsafe {
                libc::read(
                    fd.as_raw_fd(),
                    spare.as_mut_ptr() as *mut libc::c_void,
                    spare.len(),
                )
            };
            if n >= 0 {
                let n = n as usize;
                self.len += n;
                return Ok(n);
            }
            let err = io::Error::last_os_error();
            if err.kind() != io::ErrorKind::Interrupted {
                return Err(err);
            }
        }
    }

    /// Converts the capture into a uproc output field: the bytes after the
    /// first `skip`, or `None` unless more than `skip` bytes were captured.
    pub fn into_output(self, skip: usize) -> Option<Vec<u8>> {
        if self.len > skip {
            Some(self.bytes[skip..self.len].to_vec())
        } else {
            None
        }
    }
}

impl Default for CaptureBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_len_matches_progress_line() {
        let name = "test_fbindump";
        let line = format!("  Running test {}...", name);
        assert_eq!(banner_len(name), line.len());
    }

    #[test]
    fn test_extend_truncates_silently() {
        let mut buffer = CaptureBuffer::with_capacity(8);
        assert_eq!(buffer.extend_truncating(b"hello"), 5);
        assert_eq!(buffer.extend_truncating(b" world"), 3);
        assert_eq!(buffer.as_bytes(), b"hello wo");
        assert_eq!(buffer.extend_truncating(b"!"), 0);
        assert_eq!(buffer.len(), buffer.capacity());
    }

    #[test]
    fn test_into_output_absent_when_nothing_remains() {
        assert_eq!(CaptureBuffer::new().into_output(0), None);

        let mut buffer = CaptureBuffer::new();
        buffer.extend_truncating(b"  Running test t...");
        assert_eq!(buffer.clone().into_output(banner_len("t")), None);
        assert_eq!(buffer.into_output(2), Some(b"Running test t...".to_vec()));
    }

    #[test]
    fn test_into_output_strips_prefix() {
        let mut buffer = CaptureBuffer::new();
        buffer.extend_truncating(b"  Running test t...payload");
        assert_eq!(buffer.into_output(banner_len("t")), Some(b"payload".to_vec()));
    }
}
