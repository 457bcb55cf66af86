//! Thread-Local Error State
//!
//! FFI exports must not panic across the C ABI boundary and must not leave
//! precondition violations undefined. Instead, a fallible export records an
//! error here and returns a sentinel value (0 or null):
//!
//! ```ignore
//! if n < 0 {
//!     set_runtime_error(format!("fibonacci: negative index {}", n));
//!     return 0;
//! }
//! ```
//!
//! Hosts poll the error through the `cabi_*` accessors after any call that
//! can fail. State is thread-local, so concurrent callers (the usual
//! thread-pool host) never observe each other's errors.

use libc::c_char;
use std::cell::RefCell;
use std::ffi::CString;
use std::ptr;

/// Per-thread error slot.
///
/// `message` is the source of truth; `c_message` caches the NUL-terminated
/// copy handed out through `cabi_get_error`/`cabi_take_error` so the
/// returned pointer stays valid until the next state mutation.
#[derive(Default)]
struct ErrorSlot {
    message: Option<String>,
    c_message: Option<CString>,
}

thread_local! {
    static ERROR: RefCell<ErrorSlot> = RefCell::new(ErrorSlot::default());
}

/// Record an error message, replacing any pending one
pub fn set_runtime_error(msg: impl Into<String>) {
    ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        slot.message = Some(msg.into());
        slot.c_message = None; // invalidate any pointer handed out earlier
    });
}

/// Take (and clear) the pending error message
pub fn take_runtime_error() -> Option<String> {
    ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        slot.c_message = None;
        slot.message.take()
    })
}

/// Check whether an error is pending
pub fn has_runtime_error() -> bool {
    ERROR.with(|slot| slot.borrow().message.is_some())
}

/// Clear any pending error
pub fn clear_runtime_error() {
    ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        slot.message = None;
        slot.c_message = None;
    });
}

/// Encode a message for C consumption, replacing interior NULs with '?'
fn to_cstring(msg: &str) -> CString {
    let safe: String = msg.chars().map(|c| if c == '\0' { '?' } else { c }).collect();
    CString::new(safe).expect("NUL bytes already replaced")
}

// FFI-safe error access

/// Check whether an error is pending (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn cabi_has_error() -> bool {
    has_runtime_error()
}

/// Get the pending error as a C string pointer, or null if none (FFI-safe)
///
/// # Pointer Lifetime
/// The returned pointer is valid only until the next call that mutates the
/// error state on this thread (`set_runtime_error`, `cabi_take_error`,
/// `cabi_clear_error`, or a failing export). Copy it immediately.
#[unsafe(no_mangle)]
pub extern "C" fn cabi_get_error() -> *const c_char {
    ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        match &slot.message {
            Some(msg) => {
                let cstring = to_cstring(msg);
                let ptr = cstring.as_ptr();
                slot.c_message = Some(cstring);
                ptr
            }
            None => ptr::null(),
        }
    })
}

/// Take (and clear) the pending error as a C string pointer, or null (FFI-safe)
///
/// # Pointer Lifetime
/// Same contract as [`cabi_get_error`]: valid until the next error-state
/// mutation on this thread.
#[unsafe(no_mangle)]
pub extern "C" fn cabi_take_error() -> *const c_char {
    ERROR.with(|slot| {
        let mut slot = slot.borrow_mut();
        match slot.message.take() {
            Some(msg) => {
                let cstring = to_cstring(&msg);
                let ptr = cstring.as_ptr();
                slot.c_message = Some(cstring);
                ptr
            }
            None => ptr::null(),
        }
    })
}

/// Clear any pending error (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn cabi_clear_error() {
    clear_runtime_error();
}
