//! String allocation accounting
//!
//! Hosts that drive [`cabi_create_string`](crate::string_ops::cabi_create_string)
//! and [`cabi_free_string`](crate::string_ops::cabi_free_string) from a
//! dynamic-FFI layer have no visibility into the Rust allocator, so leak
//! checks need a counter the host can read back. Two global atomics cover
//! that: buffers currently live, and buffers created since load.
//!
//! Updates are single relaxed atomic ops on the allocation path; the
//! counters are exact only when no allocation is concurrently in flight.

use std::sync::atomic::{AtomicU64, Ordering};

/// Buffers created and not yet freed
static LIVE_STRINGS: AtomicU64 = AtomicU64::new(0);

/// Buffers created since the library was loaded (never decremented)
static TOTAL_STRINGS: AtomicU64 = AtomicU64::new(0);

/// Record a buffer allocation
pub(crate) fn note_string_created() {
    LIVE_STRINGS.fetch_add(1, Ordering::Relaxed);
    TOTAL_STRINGS.fetch_add(1, Ordering::Relaxed);
}

/// Record a buffer release
pub(crate) fn note_string_freed() {
    LIVE_STRINGS.fetch_sub(1, Ordering::Relaxed);
}

/// Number of string buffers currently live
pub fn live_strings() -> u64 {
    LIVE_STRINGS.load(Ordering::Relaxed)
}

/// Number of string buffers created since load
pub fn total_strings_created() -> u64 {
    TOTAL_STRINGS.load(Ordering::Relaxed)
}

/// Number of string buffers currently live (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn cabi_live_strings() -> u64 {
    live_strings()
}

/// Number of string buffers created since load (FFI-safe)
#[unsafe(no_mangle)]
pub extern "C" fn cabi_total_strings_created() -> u64 {
    total_strings_created()
}
