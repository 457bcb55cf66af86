//! cabi-utils: native utility functions behind a C ABI
//!
//! A small library meant to be loaded by dynamic-FFI hosts (Python
//! `ctypes`, `dlopen` users) or linked statically, while remaining an
//! ordinary safe Rust library. Every `cabi_`-prefixed export wraps a safe
//! core function.
//!
//! Key design principles:
//! - FFI exports never panic across the boundary: fallible operations
//!   record a thread-local error and return a sentinel (see `error`)
//! - Preconditions the C world leaves undefined (negative Fibonacci index,
//!   accumulator overflow, null inputs) are rejected explicitly
//! - Heap buffers handed across the boundary are owned values on the Rust
//!   side (`CStringBuf`), so a double release is not expressible here
//!
//! # Modules
//!
//! - `error`: thread-local error state with FFI-safe accessors
//! - `array_ops`: sum-of-squares reduction over an `i32` sequence
//! - `fib`: iterative Fibonacci
//! - `string_ops`: owned NUL-terminated buffers, duplicate/free pair
//! - `alloc_stats`: live-allocation counters for host-side leak checks

pub mod alloc_stats;
pub mod array_ops;
pub mod error;
pub mod fib;
pub mod string_ops;

// Re-export key types and functions
pub use string_ops::CStringBuf;

// Safe cores
pub use array_ops::sum_of_squares;
pub use fib::{MAX_FIB_INDEX, fibonacci};

// Error handling
pub use error::{
    cabi_clear_error as clear_error, cabi_get_error as get_error, cabi_has_error as has_error,
    cabi_take_error as take_error, clear_runtime_error, has_runtime_error, set_runtime_error,
    take_runtime_error,
};

// C ABI exports with short names for Rust callers
pub use array_ops::cabi_sum_of_squares;
pub use fib::cabi_fibonacci;
pub use string_ops::{cabi_create_string as create_string, cabi_free_string as free_string};

// Allocation accounting
pub use alloc_stats::{
    cabi_live_strings, cabi_total_strings_created, live_strings, total_strings_created,
};
