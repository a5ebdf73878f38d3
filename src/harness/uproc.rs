//! # Isolated Execution ("uproc")
//!
//! Runs a function in a forked child process with its stdout and stderr
//! redirected into pipes, waits for it to exit, and hands back the exit code
//! together with whatever the child wrote. A test that expects its code under
//! test to exit the process (or crash it) runs that code in a uproc and
//! inspects the [`UprocStatus`].
//!
//! ## Lifecycle
//!
//! 1. Two pipes are created, one per stream.
//! 2. The process forks. The child points fd 1 and fd 2 at the pipes' write
//!    ends, closes every pipe descriptor it inherited and calls the entry
//!    function. It never returns into the harness: a returning entry exits 0,
//!    a panicking one exits [`UPROC_PANIC_EXIT_CODE`].
//! 3. The parent closes its write ends and blocks in `waitpid` until the child
//!    terminates. There is no overall timeout; a hung child hangs the run.
//! 4. For each stream the parent waits (bounded by
//!    [`UprocConfig::ready_timeout`]) for the read end to become readable and
//!    performs a single read into a [`CaptureBuffer`].
//!
//! Because output is drained only after the child exits, a child that fills
//! the OS pipe buffer before exiting blocks forever. Keep uproc output small.
//!
//! ## Banner handling
//!
//! The child is a copy of the parent, including any bytes still sitting in the
//! parent's stdout buffer. Under [`BannerPolicy::Flush`] stdio is flushed before
//! forking so the child starts clean. Under [`BannerPolicy::Strip`] the
//! runner's unflushed progress line reaches the pipe first and
//! [`banner_len`] bytes are dropped from the front of the capture.
//!
//! No tracing events are emitted in the child: its stderr is part of the
//! capture.

use super::capture::{banner_len, CaptureBuffer};
use super::registry::TestToken;
use crate::config::{self, BannerPolicy, UprocConfig};
use crate::errors::{HarnessError, HarnessResult, Stream};
use std::borrow::Cow;
use std::io::{self, Write};
use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, OwnedFd, RawFd};
use std::panic::{self, AssertUnwindSafe};
use std::process;
use tracing::{debug, trace, warn};

/// Exit code of a uproc whose entry function panicked.
pub const UPROC_PANIC_EXIT_CODE: i32 = 101;

/// Exit code of a uproc that could not redirect its standard streams.
pub const UPROC_REDIRECT_EXIT_CODE: i32 = 127;

/// What a uproc left behind.
///
/// `stdout` and `stderr` are `None` when nothing was captured, never
/// `Some(vec![])`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UprocStatus {
    pub exit_code: i32,
    pub stdout: Option<Vec<u8>>,
    pub stderr: Option<Vec<u8>>,
}

impl UprocStatus {
    pub fn stdout_lossy(&self) -> Option<Cow<'_, str>> {
        self.stdout.as_deref().map(String::from_utf8_lossy)
    }

    pub fn stderr_lossy(&self) -> Option<Cow<'_, str>> {
        self.stderr.as_deref().map(String::from_utf8_lossy)
    }
}

/// Runs `entry(args)` in a uproc using the process-wide configuration.
///
/// `token` identifies the calling test; it is only used to size the banner
/// prefix under [`BannerPolicy::Strip`].
pub fn create_uproc<T, A, F>(token: T, entry: F, args: A) -> HarnessResult<UprocStatus>
where
    T: TestToken,
    F: FnOnce(A),
{
    Uproc::new(&config::current().uproc).run(token, entry, args)
}

/// The isolated execution primitive, bound to one configuration.
#[derive(Debug, Clone, Copy)]
pub struct Uproc<'a> {
    config: &'a UprocConfig,
}

impl<'a> Uproc<'a> {
    pub fn new(config: &'a UprocConfig) -> Self {
        Self { config }
    }

    pub fn run<T, A, F>(&self, token: T, entry: F, args: A) -> HarnessResult<UprocStatus>
    where
        T: TestToken,
        F: FnOnce(A),
    {
        self.run_named(token.name(), entry, args)
    }

    /// Like [`Uproc::run`], for callers that identify the test by name.
    pub fn run_named<A, F>(&self, test_name: &'static str, entry: F, args: A) -> HarnessResult<UprocStatus>
    where
        F: FnOnce(A),
    {
        let skip = match self.config.banner {
            BannerPolicy::Flush => {
                flush_stdio();
                0
            }
            BannerPolicy::Strip => banner_len(test_name),
        };

        let stdout_pipe = Pipe::open(Stream::Stdout)?;
        let stderr_pipe = Pipe::open(Stream::Stderr)?;

        debug!(test = test_name, "forking uproc");
        // SAFETY: the child only redirects descriptors and then runs `entry`
        // before exiting; it never returns into the caller's frames.
        let pid = unsafe { libc::fork() };
        if pid < 0 {
            let source = io::Error::last_os_error();
            warn!(test = test_name, error = %source, "fork failed");
            return Err(HarnessError::Spawn { test_name, source });
        }
        if pid == 0 {
            run_child(stdout_pipe, stderr_pipe, entry, args);
        }

        let stdout_rx = stdout_pipe.into_read_end();
        let stderr_rx = stderr_pipe.into_read_end();

        let status = wait_for(pid)?;
        if !libc::WIFEXITED(status) {
            let err = HarnessError::abnormal_exit(pid, status);
            warn!(test = test_name, error = %err, "uproc terminated abnormally");
            return Err(err);
        }
        let exit_code = libc::WEXITSTATUS(status);
        debug!(test = test_name, pid, exit_code, "uproc exited");

        let stdout = self.drain(stdout_rx.as_fd(), Stream::Stdout)?;
        let stderr = self.drain(stderr_rx.as_fd(), Stream::Stderr)?;
        trace!(
            test = test_name,
            stdout_len = stdout.len(),
            stderr_len = stderr.len(),
            skip,
            "drained uproc output"
        );

        Ok(UprocStatus {
            exit_code,
            stdout: stdout.into_output(skip),
            stderr: stderr.into_output(0),
        })
    }

    fn drain(&self, fd: BorrowedFd<'_>, stream: Stream) -> HarnessResult<CaptureBuffer> {
        let mut buffer = CaptureBuffer::new();
        if wait_readable(fd, stream, self.config)? {
            buffer
                .fill_from(fd)
                .map_err(|source| HarnessError::Read { stream, source })?;
        }
        Ok(buffer)
    }
}

// ============================================================================
// CHILD SIDE
// ============================================================================

fn run_child<A, F>(stdout: Pipe, stderr: Pipe, entry: F, args: A) -> !
where
    F: FnOnce(A),
{
    let redirected = redirect(stdout.write.as_raw_fd(), libc::STDOUT_FILENO)
        .and_then(|_| redirect(stderr.write.as_raw_fd(), libc::STDERR_FILENO));
    if redirected.is_err() {
        // SAFETY: terminating the child without touching shared state.
        unsafe { libc::_exit(UPROC_REDIRECT_EXIT_CODE) }
    }
    drop(stdout);
    drop(stderr);

    let code = match panic::catch_unwind(AssertUnwindSafe(move || entry(args))) {
        Ok(()) => 0,
        Err(_) => UPROC_PANIC_EXIT_CODE,
    };
    process::exit(code)
}

fn redirect(from: RawFd, to: RawFd) -> io::Result<()> {
    loop {
        // SAFETY: plain descriptor duplication on descriptors owned by this process.
        if unsafe { libc::dup2(from, to) } != -1 {
            return Ok(());
        }
        let err = io::Error::last_os_error();
        if err.kind() != io::ErrorKind::Interrupted {
            return Err(err);
        }
    }
}

// ============================================================================
// PARENT SIDE
// ============================================================================

struct Pipe {
    read: OwnedFd,
    write: OwnedFd,
}

impl Pipe {
    fn open(stream: Stream) -> HarnessResult<Self> {
        let mut fds: [RawFd; 2] = [-1; 2];
        // SAFETY: `fds` has room for the two descriptors pipe(2) writes.
        if unsafe { libc::pipe(fds.as_mut_ptr()) } == -1 {
            let source = io::Error::last_os_error();
            warn!(%stream, error = %source, "pipe creation failed");
            return Err(HarnessError::Pipe { stream, source });
        }
        // SAFETY: pipe(2) succeeded, so both descriptors are open and unowned.
        let (read, write) = unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) };
        Ok(Self { read, write })
    }

    /// Closes the write end and keeps the read end.
    fn into_read_end(self) -> OwnedFd {
        drop(self.write);
        self.read
    }
}

fn flush_stdio() {
    let _ = io::stdout().flush();
    let _ = io::stderr().flush();
}

fn wait_for(pid: libc::pid_t) -> HarnessResult<i32> {
    let mut status: libc::c_int = 0;
    loop {
        // SAFETY: `status` is a valid out-pointer and `pid` is our child.
        let rc = unsafe { libc::waitpid(pid, &mut status, 0) };
        if rc == pid {
            return Ok(status);
        }
        let source = io::Error::last_os_error();
        if source.kind() == io::ErrorKind::Interrupted {
            continue;
        }
        warn!(pid, error = %source, "waitpid failed");
        return Err(HarnessError::Wait { pid, source });
    }
}

/// Returns `Ok(false)` when `fd` has nothing to read within the timeout.
fn wait_readable(fd: BorrowedFd<'_>, stream: Stream, config: &UprocConfig) -> HarnessResult<bool> {
    let timeout_ms = config.ready_timeout.as_millis().min(libc::c_int::MAX as u128) as libc::c_int;
    let mut attempts = 0;
    loop {
        let mut pollfd = libc::pollfd {
            fd: fd.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };
        // SAFETY: one valid pollfd entry.
        let ready = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };
        if ready == 0 {
            trace!(%stream, "no uproc output before timeout");
            return Ok(false);
        }
        if ready > 0 {
            return Ok(pollfd.revents != 0);
        }

        let source = io::Error::last_os_error();
        if source.kind() != io::ErrorKind::Interrupted {
            return Err(HarnessError::Ready { stream, source });
        }
        attempts += 1;
        if attempts > config.ready_retries {
            return Err(HarnessError::ReadyInterrupted { stream, attempts });
        }
        debug!(%stream, attempts, "readiness wait interrupted, retrying");
    }
}
