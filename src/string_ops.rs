//! Owned C string buffers
//!
//! [`CStringBuf`] is a heap-allocated, NUL-terminated byte buffer whose
//! release responsibility belongs to whoever holds it. Inside Rust that is
//! ordinary move semantics: dropping the value frees the buffer, and a
//! second release cannot be expressed. Across the C ABI the same buffer
//! travels as a raw `char*` through [`cabi_create_string`] and comes back
//! through [`cabi_free_string`], with "exactly one free per create" stated
//! as the caller's contract.
//!
//! Buffers hold arbitrary bytes, not just UTF-8; the only structural
//! requirement is the trailing NUL.
//!
//! # Safety Invariants
//! - `ptr` points to a live allocation of `len + 1` bytes made by
//!   `CString`, with `ptr[len] == 0` and no interior NULs
//! - the allocation is freed exactly once, by `Drop` or by the raw-pointer
//!   holder after `into_raw`

use crate::alloc_stats;
use crate::error::set_runtime_error;
use libc::c_char;
use std::ffi::{CStr, CString};
use std::fmt;
use std::ptr;

/// Owned, NUL-terminated heap buffer
pub struct CStringBuf {
    ptr: *mut c_char,
    len: usize, // bytes, excluding the terminator
}

// Safety: the buffer is an independent heap allocation, immutable after
// construction, and freed by whichever thread drops the owning value.
unsafe impl Send for CStringBuf {}
unsafe impl Sync for CStringBuf {}

impl CStringBuf {
    /// Deep-copy a borrowed C string into a new owned buffer
    pub fn duplicate(input: &CStr) -> CStringBuf {
        let bytes = input.to_bytes();
        let len = bytes.len();
        let owned = CString::new(bytes).expect("CStr bytes have no interior NUL");
        alloc_stats::note_string_created();
        CStringBuf {
            ptr: owned.into_raw(),
            len,
        }
    }

    /// Byte length, excluding the terminator
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the buffer holds the empty string
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// View the buffer as a `&CStr`
    pub fn as_c_str(&self) -> &CStr {
        // Safety: ptr covers len + 1 valid bytes ending in the terminator,
        // with no interior NULs (constructor invariant)
        unsafe {
            let with_nul = std::slice::from_raw_parts(self.ptr as *const u8, self.len + 1);
            CStr::from_bytes_with_nul_unchecked(with_nul)
        }
    }

    /// Buffer contents without the terminator
    pub fn as_bytes(&self) -> &[u8] {
        self.as_c_str().to_bytes()
    }

    /// Raw pointer to the buffer (borrow, ownership unchanged)
    pub fn as_ptr(&self) -> *const c_char {
        self.ptr
    }

    /// Consume self and hand the allocation to a raw-pointer holder
    ///
    /// The buffer stays counted as live until it comes back through
    /// [`CStringBuf::from_raw`] (or [`cabi_free_string`]) and is dropped.
    pub fn into_raw(self) -> *mut c_char {
        let ptr = self.ptr;
        std::mem::forget(self); // don't run Drop, ownership moves to the pointer
        ptr
    }

    /// Reclaim ownership of a buffer previously released with `into_raw`
    ///
    /// # Safety
    /// `ptr` must have come from [`CStringBuf::into_raw`] (equivalently,
    /// from [`cabi_create_string`]) and must not be used afterwards.
    pub unsafe fn from_raw(ptr: *mut c_char) -> CStringBuf {
        let len = unsafe { CStr::from_ptr(ptr) }.to_bytes().len();
        CStringBuf { ptr, len }
    }
}

// Content equality, not pointer equality
impl PartialEq for CStringBuf {
    fn eq(&self, other: &Self) -> bool {
        self.as_bytes() == other.as_bytes()
    }
}

impl Eq for CStringBuf {}

impl Drop for CStringBuf {
    fn drop(&mut self) {
        // Safety: ptr came from CString::into_raw in the constructor and is
        // dropped at most once (move semantics)
        unsafe {
            drop(CString::from_raw(self.ptr));
        }
        alloc_stats::note_string_freed();
    }
}

impl fmt::Debug for CStringBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CStringBuf({:?}, len={})", self.as_c_str(), self.len)
    }
}

impl fmt::Display for CStringBuf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(self.as_bytes()))
    }
}

impl From<&CStr> for CStringBuf {
    fn from(input: &CStr) -> Self {
        CStringBuf::duplicate(input)
    }
}

/// Duplicate a NUL-terminated string into a new owned buffer (FFI-safe)
///
/// The returned buffer is a distinct allocation holding the same bytes plus
/// the terminator. Ownership transfers to the caller, who must release it
/// with [`cabi_free_string`] exactly once. A null `input` sets the runtime
/// error and returns null; callers must check before use.
///
/// # Safety
/// A non-null `input` must point to a NUL-terminated byte sequence that
/// stays valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cabi_create_string(input: *const c_char) -> *mut c_char {
    if input.is_null() {
        set_runtime_error("create_string: null input");
        return ptr::null_mut();
    }

    let source = unsafe { CStr::from_ptr(input) };
    CStringBuf::duplicate(source).into_raw()
}

/// Release a buffer returned by [`cabi_create_string`] (FFI-safe)
///
/// Null is a no-op, not an error.
///
/// # Safety
/// A non-null `s` must have come from [`cabi_create_string`] and must not
/// be passed here twice or used after this call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn cabi_free_string(s: *mut c_char) {
    if s.is_null() {
        return;
    }
    drop(unsafe { CStringBuf::from_raw(s) });
}
