//! Minimal JSON marshalling.
//!
//! Produces JSON-safe objects that omit `null` entries and empty objects,
//! recursing into nested objects. Arrays are kept as they are.
//!
//! Typed values (timeouts, proxy, prompt handler) are converted with their
//! own `to_json` before they reach [`marshal`], so the recursion only ever
//! sees plain JSON.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};

// ============================================================================
// Public Functions
// ============================================================================

/// Marshals `entries` into an object, dropping empty values.
///
/// # Example
///
/// ```
/// use firefox_capabilities::capabilities::marshal;
/// use serde_json::json;
///
/// let out = marshal([
///     ("a", json!(1)),
///     ("b", json!(null)),
///     ("c", json!({ "d": null })),
/// ]);
/// assert_eq!(serde_json::Value::Object(out), json!({ "a": 1 }));
/// ```
#[must_use]
pub fn marshal<K>(entries: impl IntoIterator<Item = (K, Value)>) -> Map<String, Value>
where
    K: Into<String>,
{
    let mut out = Map::new();

    for (key, value) in entries {
        let value = match value {
            Value::Null => continue,
            Value::Object(object) => Value::Object(marshal(object)),
            other => other,
        };

        if is_empty_object(&value) {
            continue;
        }

        out.insert(key.into(), value);
    }

    out
}

/// Returns `true` if `value` is an object with no entries.
#[inline]
#[must_use]
pub fn is_empty_object(value: &Value) -> bool {
    value.as_object().is_some_and(Map::is_empty)
}

// ============================================================================
// Tests
// ============================================================================
