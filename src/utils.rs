//! Personal utility functions: fatal exits, zero-filling allocation and
//! binary dumps. These are what the brz suite exercises.

pub mod alloc;
pub mod dump;
pub mod fatal;

pub use alloc::{safe_calloc, safe_malloc, ALLOCATION_FAILED};
pub use dump::{bindump, fbindump, BYTES_PER_LINE};
pub use fatal::{fatal_error, format_fatal_message, ERROR_MESSAGE_MAX_LENGTH, ERROR_PREFIX};
