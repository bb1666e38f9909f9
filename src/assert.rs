//! Typed assertions over untrusted JSON.
//!
//! Each assertion returns the value in its Rust shape or an
//! [`Error::InvalidArgument`] built from the lazily evaluated message.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Largest integer a JSON number can carry without losing precision.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

// ============================================================================
// Assertions
// ============================================================================

/// Asserts that `value` is a boolean.
pub fn boolean(value: &Value, message: impl FnOnce() -> String) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::invalid_argument(message()))
}

/// Asserts that `value` is a string.
pub fn string<'a>(value: &'a Value, message: impl FnOnce() -> String) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::invalid_argument(message()))
}

/// Asserts that `value` is a plain JSON object.
pub fn object<'a>(
    value: &'a Value,
    message: impl FnOnce() -> String,
) -> Result<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::invalid_argument(message()))
}

/// Asserts that `value` is an array.
pub fn array<'a>(value: &'a Value, message: impl FnOnce() -> String) -> Result<&'a [Value]> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| Error::invalid_argument(message()))
}

/// Asserts that `value` is an array with at least one element.
pub fn non_empty_array<'a>(
    value: &'a Value,
    message: impl FnOnce() -> String,
) -> Result<&'a [Value]> {
    match value.as_array() {
        Some(items) if !items.is_empty() => Ok(items),
        _ => Err(Error::invalid_argument(message())),
    }
}

/// Asserts that `value` is a finite, non-negative integer.
///
/// Integral floats such as `5.0` are accepted, matching JSON number
/// semantics where `5` and `5.0` are the same value.
pub fn positive_integer(value: &Value, message: impl FnOnce() -> String) -> Result<u64> {
    if let Some(n) = value.as_u64() {
        return if n <= MAX_SAFE_INTEGER as u64 {
            Ok(n)
        } else {
            Err(Error::invalid_argument(message()))
        };
    }

    match value.as_f64() {
        Some(f) if f.is_finite() && f >= 0.0 && f.fract() == 0.0 && f <= MAX_SAFE_INTEGER => {
            Ok(f as u64)
        }
        _ => Err(Error::invalid_argument(message())),
    }
}

// ============================================================================
// Tests
// ============================================================================
