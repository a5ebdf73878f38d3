// Shared helpers for integration tests that touch the process's stdout.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd};

/// Points fd 1 at /dev/null until dropped, so banners left in the stdout
/// buffer never reach the test log. Output already buffered is flushed to
/// the real stdout first.
pub struct SilencedStdout {
    saved: OwnedFd,
}

impl SilencedStdout {
    pub fn new() -> Self {
        io::stdout().flush().unwrap();
        let null = OpenOptions::new().write(true).open("/dev/null").unwrap();
        // SAFETY: duplicating and replacing descriptors this process owns.
        let saved = unsafe { libc::dup(libc::STDOUT_FILENO) };
        assert!(saved >= 0, "dup(stdout) failed");
        assert!(unsafe { libc::dup2(null.as_raw_fd(), libc::STDOUT_FILENO) } >= 0);
        Self {
            // SAFETY: `saved` was just returned by dup and is owned by nobody else.
            saved: unsafe { OwnedFd::from_raw_fd(saved) },
        }
    }
}

impl Drop for SilencedStdout {
    fn drop(&mut self) {
        let _ = io::stdout().flush();
        // SAFETY: restores the descriptor saved in `new`.
        unsafe {
            libc::dup2(self.saved.as_raw_fd(), libc::STDOUT_FILENO);
        }
    }
}
