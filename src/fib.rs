//! Iterative Fibonacci
//!
//! 0-indexed: F(0) = 0, F(1) = 1. Linear time, constant space, a rolling
//! (previous, current) pair advanced n-1 times.
//!
//! Out-of-contract input is rejected rather than left undefined: a negative
//! index, or one past [`MAX_FIB_INDEX`], makes the safe core return `None`
//! and the FFI export set the runtime error and return 0.

use crate::error::set_runtime_error;
use libc::c_longlong;

/// Largest index whose Fibonacci number fits an `i64` (F(93) overflows)
pub const MAX_FIB_INDEX: i64 = 92;

/// The nth Fibonacci number, or `None` outside `0..=MAX_FIB_INDEX`
pub fn fibonacci(n: i64) -> Option<i64> {
    if !(0..=MAX_FIB_INDEX).contains(&n) {
        return None;
    }
    if n <= 1 {
        return Some(n);
    }

    let mut prev: i64 = 0;
    let mut current: i64 = 1;
    // The index guard keeps every intermediate value inside i64 range
    for _ in 2..=n {
        let next = prev + current;
        prev = current;
        current = next;
    }
    Some(current)
}

/// The nth Fibonacci number (FFI-safe)
///
/// Returns 0 and sets the runtime error for a negative index or one past
/// 92; poll `cabi_has_error` to distinguish that from F(0) = 0.
#[unsafe(no_mangle)]
pub extern "C" fn cabi_fibonacci(n: c_longlong) -> c_longlong {
    match fibonacci(n) {
        Some(value) => value,
        None => {
            set_runtime_error(format!(
                "fibonacci: index {} outside supported range 0..={}",
                n, MAX_FIB_INDEX
            ));
            0
        }
    }
}
