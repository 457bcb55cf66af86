//! Integer sequence reductions
//!
//! The export is designed for dynamic-FFI hosts that hand over a borrowed
//! `int` array plus its length; the host keeps ownership for the duration
//! of the call.
//!
//! # Overflow
//!
//! A single squared `i32` always fits an `i64` (the largest is
//! `i32::MIN^2 = 2^62`), so only the running sum can overflow. Overflow is
//! rejected, not wrapped: the safe core returns `None` and the FFI export
//! sets the runtime error and returns 0.

use crate::error::set_runtime_error;
use libc::{c_int, c_longlong, size_t};

/// Sum of squares of a sequence, widened to `i64`
///
/// Elements are accumulated in index order. Returns `None` if the running
/// sum leaves the `i64` range. The empty slice sums to 0.
pub fn sum_of_squares(values: &[i32]) -> Option<i64> {
    values.iter().try_fold(0i64, |acc, &v| {
        let squared = i64::from(v) * i64::from(v);
        acc.checked_add(squared)
    })
}

/// Sum of squares of a borrowed `int` array (FFI-safe)
///
/// Returns 0 for `len == 0` without reading `values` (null is permitted
/// then). A null `values` with `len > 0`, or accumulator overflow, sets the
/// runtime error and returns 0; poll `cabi_has_error` to distinguish that
/// from a genuine zero sum.
///
/// # Safety
/// When `len > 0`, `values` must point to at least `len` readable,
/// initialized C `int`s that stay valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cabi_sum_of_squares(values: *const c_int, len: size_t) -> c_longlong {
    if len == 0 {
        return 0;
    }
    if values.is_null() {
        set_runtime_error("sum_of_squares: null sequence with nonzero length");
        return 0;
    }

    let slice = unsafe { std::slice::from_raw_parts(values, len) };
    match sum_of_squares(slice) {
        Some(total) => total,
        None => {
            set_runtime_error(format!(
                "sum_of_squares: accumulator overflow summing {} elements",
                len
            ));
            0
        }
    }
}
