//! Zero-filling allocation that treats failure as fatal.

use super::fatal::fatal_error;

/// Message reported when an allocation cannot be satisfied.
pub const ALLOCATION_FAILED: &str = "Memory allocation failed";

/// Allocates `size` zeroed bytes, or exits through [`fatal_error`] with
/// code -1 if the allocation fails.
pub fn safe_malloc(size: usize) -> Vec<u8> {
    let mut segment = Vec::new();
    if segment.try_reserve_exact(size).is_err() {
        fatal_error(-1, ALLOCATION_FAILED);
    }
    segment.resize(size, 0);
    segment
}

/// Allocates `count * size` zeroed bytes. An overflowing request is treated
/// like a failed allocation.
pub fn safe_calloc(count: usize, size: usize) -> Vec<u8> {
    match count.checked_mul(size) {
        Some(total) => safe_malloc(total),
        None => fatal_error(-1, ALLOCATION_FAILED),
    }
}
