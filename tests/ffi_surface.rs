//! End-to-end tests of the C ABI surface
//!
//! Drives the exports the way a dynamic-FFI host would: raw pointers in,
//! sentinel-plus-error-state out, one free per create.

use cabi_utils::{
    cabi_fibonacci, cabi_live_strings, cabi_sum_of_squares, clear_runtime_error, create_string,
    free_string, has_error, take_error, take_runtime_error,
};
use serial_test::serial;
use std::ffi::{CStr, CString};
use std::os::raw::c_int;

#[test]
fn sum_of_squares_matches_hand_computed_values() {
    clear_runtime_error();
    let values: [c_int; 3] = [1, 2, 3];
    assert_eq!(unsafe { cabi_sum_of_squares(values.as_ptr(), 3) }, 14);

    let empty: [c_int; 0] = [];
    assert_eq!(unsafe { cabi_sum_of_squares(empty.as_ptr(), 0) }, 0);
    assert!(!has_error());
}

#[test]
fn sum_of_squares_first_ten_thousand() {
    // n(n+1)(2n+1)/6 for n = 10_000
    let values: Vec<c_int> = (1..=10_000).collect();
    let total = unsafe { cabi_sum_of_squares(values.as_ptr(), values.len()) };
    assert_eq!(total, 333_383_335_000);
}

#[test]
fn sum_of_squares_overflow_reports_through_error_state() {
    clear_runtime_error();
    let values: [c_int; 3] = [i32::MIN, i32::MIN, i32::MIN];
    let total = unsafe { cabi_sum_of_squares(values.as_ptr(), values.len()) };
    assert_eq!(total, 0);

    let error = unsafe { CStr::from_ptr(take_error()) };
    assert!(error.to_str().unwrap().contains("overflow"));
    assert!(!has_error());
}

#[test]
fn fibonacci_known_values() {
    clear_runtime_error();
    assert_eq!(cabi_fibonacci(0), 0);
    assert_eq!(cabi_fibonacci(1), 1);
    assert_eq!(cabi_fibonacci(10), 55);
    assert_eq!(cabi_fibonacci(90), 2_880_067_194_370_816_120);
    assert!(!has_error());
}

#[test]
fn fibonacci_out_of_contract_input_is_rejected() {
    clear_runtime_error();
    assert_eq!(cabi_fibonacci(-1), 0);
    assert!(take_runtime_error().is_some());

    assert_eq!(cabi_fibonacci(93), 0);
    assert!(take_runtime_error().is_some());
}

#[test]
#[serial]
fn create_string_returns_distinct_deep_copy() {
    clear_runtime_error();
    let input = CString::new("hello").unwrap();
    let copy = unsafe { create_string(input.as_ptr()) };

    assert!(!copy.is_null());
    assert_ne!(copy.cast_const(), input.as_ptr());

    let contents = unsafe { CStr::from_ptr(copy) };
    assert_eq!(contents.to_bytes_with_nul(), b"hello\0");
    assert!(!has_error());

    unsafe { free_string(copy) };
}

#[test]
fn create_string_null_input_yields_null_and_error() {
    clear_runtime_error();
    let result = unsafe { create_string(std::ptr::null()) };
    assert!(result.is_null());

    let error = unsafe { CStr::from_ptr(take_error()) };
    assert!(error.to_str().unwrap().contains("create_string"));
}

#[test]
fn free_string_null_is_a_noop() {
    clear_runtime_error();
    unsafe { free_string(std::ptr::null_mut()) };
    assert!(!has_error());
}

#[test]
#[serial]
fn balanced_create_free_leaves_no_live_buffers() {
    let live_before = cabi_live_strings();

    let mut raw = Vec::new();
    for i in 0..100 {
        let input = CString::new(format!("buffer {}", i)).unwrap();
        raw.push(unsafe { create_string(input.as_ptr()) });
    }
    assert_eq!(cabi_live_strings(), live_before + 100);

    for ptr in raw {
        unsafe { free_string(ptr) };
    }
    assert_eq!(cabi_live_strings(), live_before);
}

#[test]
#[serial]
fn concurrent_calls_from_a_thread_pool() {
    // The usual host drives these exports from a thread pool: every worker
    // reduces the shared array, probes fibonacci, and round-trips strings.
    let values: Vec<c_int> = (1..=10_000).collect();
    let shared = std::sync::Arc::new(values);
    let live_before = cabi_live_strings();

    let workers: Vec<_> = (0..8)
        .map(|worker| {
            let values = std::sync::Arc::clone(&shared);
            std::thread::spawn(move || {
                for round in 0..50 {
                    let total = unsafe { cabi_sum_of_squares(values.as_ptr(), values.len()) };
                    assert_eq!(total, 333_383_335_000);

                    assert_eq!(cabi_fibonacci(90), 2_880_067_194_370_816_120);

                    let input = CString::new(format!("worker {} round {}", worker, round)).unwrap();
                    let copy = unsafe { create_string(input.as_ptr()) };
                    assert_eq!(unsafe { CStr::from_ptr(copy) }.to_bytes(), input.as_bytes());
                    unsafe { free_string(copy) };

                    // error state is thread-local: this worker's rejection
                    // is visible only to this worker
                    assert_eq!(cabi_fibonacci(-1), 0);
                    assert!(take_runtime_error().is_some());
                }
            })
        })
        .collect();

    for worker in workers {
        worker.join().unwrap();
    }

    assert_eq!(cabi_live_strings(), live_before);
}
