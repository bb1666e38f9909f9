//! Session timeouts.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::Timeouts;
//! use serde_json::json;
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let timeouts = Timeouts::from_json(&json!({ "script": null }))?;
//! assert_eq!(
//!     timeouts.to_json(),
//!     json!({ "implicit": 0, "pageLoad": 300000, "script": null })
//! );
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::Serialize;
use serde_json::{Value, json};

use crate::assert;
use crate::error::{Error, Result};
use crate::format::{pprint, truncate};

// ============================================================================
// Constants
// ============================================================================

/// Default implicit wait: disabled.
pub const DEFAULT_IMPLICIT_MS: u64 = 0;

/// Default page load timeout: five minutes.
pub const DEFAULT_PAGE_LOAD_MS: u64 = 300_000;

/// Default script timeout: 30 seconds.
pub const DEFAULT_SCRIPT_MS: u64 = 30_000;

// ============================================================================
// Timeouts
// ============================================================================

/// WebDriver session timeouts in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeouts {
    /// Implicit element-location wait.
    pub implicit: u64,

    /// Page load timeout.
    pub page_load: u64,

    /// Script timeout. `None` means scripts never time out.
    pub script: Option<u64>,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            implicit: DEFAULT_IMPLICIT_MS,
            page_load: DEFAULT_PAGE_LOAD_MS,
            script: Some(DEFAULT_SCRIPT_MS),
        }
    }
}

// ============================================================================
// Timeouts - Serialization
// ============================================================================

impl Timeouts {
    /// Parses timeouts from JSON.
    ///
    /// Keys that are absent keep their default. Every call yields a fresh
    /// value, there is no merge with a previous one.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `json` is not an object, holds
    /// an unknown key, or a duration is not a non-negative integer
    /// (`script` may also be `null`).
    pub fn from_json(json: &Value) -> Result<Self> {
        let entries = assert::object(json, || {
            format!("Expected \"timeouts\" to be an object, got {}", pprint(json))
        })?;

        let mut timeouts = Self::default();

        for (kind, ms) in entries {
            match kind.as_str() {
                "implicit" => timeouts.implicit = duration(kind, ms)?,
                "pageLoad" => timeouts.page_load = duration(kind, ms)?,
                "script" => {
                    timeouts.script = if ms.is_null() {
                        None
                    } else {
                        Some(duration(kind, ms)?)
                    };
                }
                _ => {
                    return Err(Error::invalid_argument(format!(
                        "Unrecognized timeout: {}",
                        truncate(kind)
                    )));
                }
            }
        }

        Ok(timeouts)
    }

    /// Marshals all three durations, defaults included.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "implicit": self.implicit,
            "pageLoad": self.page_load,
            "script": self.script,
        })
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

fn duration(kind: &str, ms: &Value) -> Result<u64> {
    assert::positive_integer(ms, || {
        format!("Expected \"{kind}\" to be a positive integer, got {}", pprint(ms))
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let t = Timeouts::default();
        assert_eq!(t.implicit, 0);
        assert_eq!(t.page_load, 300_000);
        assert_eq!(t.script, Some(30_000));
    }

    #[test]
    fn test_from_json_empty_keeps_defaults() {
        let t = Timeouts::from_json(&json!({})).unwrap();
        assert_eq!(t, Timeouts::default());
    }

    #[test]
    fn test_from_json_all_keys() {
        let t = Timeouts::from_json(&json!({
            "implicit": 1000,
            "pageLoad": 2000,
            "script": 3000,
        }))
        .unwrap();
        assert_eq!(t.implicit, 1000);
        assert_eq!(t.page_load, 2000);
        assert_eq!(t.script, Some(3000));
    }

    #[test]
    fn test_from_json_null_script() {
        let t = Timeouts::from_json(&json!({ "script": null })).unwrap();
        assert_eq!(t.script, None);
        assert_eq!(
            t.to_json(),
            json!({ "implicit": 0, "pageLoad": 300000, "script": null })
        );
    }

    #[test]
    fn test_from_json_null_implicit_rejected() {
        let err = Timeouts::from_json(&json!({ "implicit": null })).unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_from_json_negative_rejected() {
        let err = Timeouts::from_json(&json!({ "pageLoad": -1 })).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: Expected \"pageLoad\" to be a positive integer, got -1"
        );
    }

    #[test]
    fn test_from_json_fraction_rejected() {
        assert!(Timeouts::from_json(&json!({ "script": 2.5 })).is_err());
    }

    #[test]
    fn test_from_json_unknown_key() {
        let err = Timeouts::from_json(&json!({ "foo": 1 })).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Unrecognized timeout: foo");
    }

    #[test]
    fn test_from_json_long_unknown_key_truncated() {
        let mut entries = serde_json::Map::new();
        entries.insert("k".repeat(5000), json!(1));

        let err = Timeouts::from_json(&Value::Object(entries)).unwrap_err();
        let message = err.to_string();
        assert!(message.contains(" ... "));
        assert!(message.len() < 400);
    }

    #[test]
    fn test_from_json_beyond_safe_integer_rejected() {
        assert!(Timeouts::from_json(&json!({ "implicit": 9_007_199_254_740_993u64 })).is_err());
        assert!(Timeouts::from_json(&json!({ "pageLoad": 9_007_199_254_740_992.0 })).is_err());
        assert_eq!(
            Timeouts::from_json(&json!({ "script": 9_007_199_254_740_991u64 }))
                .unwrap()
                .script,
            Some(9_007_199_254_740_991)
        );
    }

    #[test]
    fn test_from_json_not_object() {
        assert!(Timeouts::from_json(&json!([])).is_err());
        assert!(Timeouts::from_json(&json!(null)).is_err());
    }

    #[test]
    fn test_round_trip() {
        let t = Timeouts {
            implicit: 5,
            page_load: 10,
            script: None,
        };
        assert_eq!(Timeouts::from_json(&t.to_json()).unwrap(), t);
    }

    #[test]
    fn test_serialize_matches_to_json() {
        let t = Timeouts::default();
        assert_eq!(serde_json::to_value(t).unwrap(), t.to_json());
    }
}
