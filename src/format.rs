//! Bounded stringification of JSON values for error messages.
//!
//! Client payloads can be arbitrarily large, so values embedded in error
//! messages are rendered as compact JSON and truncated around the middle.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

// ============================================================================
// Constants
// ============================================================================

/// Maximum number of characters kept from a rendered value.
pub const MAX_STRING_LENGTH: usize = 250;

/// Separator placed between the kept head and tail of a truncated value.
const ELLIPSIS: &str = " ... ";

// ============================================================================
// Public Functions
// ============================================================================

/// Renders a JSON value for inclusion in an error message.
///
/// Strings are quoted, everything else is compact JSON. The result never
/// exceeds [`MAX_STRING_LENGTH`] characters plus the ellipsis.
///
/// # Example
///
/// ```
/// use firefox_capabilities::format::pprint;
/// use serde_json::json;
///
/// assert_eq!(pprint(&json!("eager")), r#""eager""#);
/// assert_eq!(pprint(&json!({"a": 1})), r#"{"a":1}"#);
/// ```
#[must_use]
pub fn pprint(value: &Value) -> String {
    truncate(&value.to_string())
}

/// Shortens `s` to at most [`MAX_STRING_LENGTH`] characters.
///
/// Keeps the first and last halves and joins them with `" ... "`.
#[must_use]
pub fn truncate(s: &str) -> String {
    let count = s.chars().count();
    if count <= MAX_STRING_LENGTH {
        return s.to_string();
    }

    let half = MAX_STRING_LENGTH / 2;
    let head: String = s.chars().take(half).collect();
    let tail: String = s.chars().skip(count - half).collect();
    format!("{head}{ELLIPSIS}{tail}")
}

// ============================================================================
// Tests
// ============================================================================
