//! Capability processing.
//!
//! A session-creation request goes through three phases, stopping at the
//! first error:
//!
//! 1. **Validate** `alwaysMatch` and every `firstMatch` entry key by key.
//! 2. **Merge** each validated `firstMatch` entry into `alwaysMatch`. A key
//!    present in both is an error.
//! 3. **Select** the first merged candidate.
//!
//! Nothing here touches the browser. The selected set is plain JSON; the
//! `proxy`, `timeouts` and `unhandledPromptBehavior` values in it are the
//! raw client values, parsed again when the session map is built.

// ============================================================================
// Imports
// ============================================================================

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::assert;
use crate::capabilities::registry;
use crate::error::{Error, Result};
use crate::format::{pprint, truncate};
use crate::host::HostInfo;

// ============================================================================
// Constants
// ============================================================================

/// Capabilities kept in raw form by [`validate_capabilities`].
pub const DEFERRED_CAPABILITIES: [&str; 3] = ["proxy", "timeouts", "unhandledPromptBehavior"];

// ============================================================================
// Phases
// ============================================================================

/// Validates a capabilities object.
///
/// Entries that validate to `null` are dropped. Deferred capabilities keep
/// their raw value, every other entry its coerced value.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `capabilities` is not an object or
/// any entry fails validation.
pub fn validate_capabilities(capabilities: &Value, host: &HostInfo) -> Result<Map<String, Value>> {
    let entries = assert::object(capabilities, || {
        format!(
            "Expected \"capabilities\" to be an object, got {}",
            pprint(capabilities)
        )
    })?;

    let mut result = Map::new();

    for (name, value) in entries {
        let validated = registry::validate(name, value, host)?;
        if validated.is_null() {
            continue;
        }

        let stored = if DEFERRED_CAPABILITIES.contains(&name.as_str()) {
            value.clone()
        } else {
            validated.to_json()
        };
        result.insert(name.clone(), stored);
    }

    trace!(count = result.len(), "Validated capabilities");
    Ok(result)
}

/// Merges `secondary` into a copy of `primary`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if a key of `secondary` is already
/// present in `primary`.
///
/// # Example
///
/// ```
/// use firefox_capabilities::negotiation::merge_capabilities;
/// use serde_json::{Value, json};
///
/// let a = json!({ "a": 1 });
/// let primary = a.as_object().unwrap();
///
/// let b = json!({ "b": 2 });
/// let merged = merge_capabilities(primary, b.as_object()).unwrap();
/// assert_eq!(Value::Object(merged), json!({ "a": 1, "b": 2 }));
///
/// let clash = json!({ "a": 2 });
/// assert!(merge_capabilities(primary, clash.as_object()).is_err());
/// ```
pub fn merge_capabilities(
    primary: &Map<String, Value>,
    secondary: Option<&Map<String, Value>>,
) -> Result<Map<String, Value>> {
    let mut result = primary.clone();

    let Some(secondary) = secondary else {
        return Ok(result);
    };

    for (name, value) in secondary {
        if primary.contains_key(name) {
            return Err(Error::invalid_argument(format!(
                "firstMatch key {} shadowed a value in alwaysMatch",
                truncate(name)
            )));
        }
        result.insert(name.clone(), value.clone());
    }

    Ok(result)
}

/// Processes the parameters of a New Session request.
///
/// `params` is `{"capabilities": {"alwaysMatch"?: {...}, "firstMatch"?: [...]}}`.
/// A missing `alwaysMatch` is `{}`, a missing `firstMatch` is `[{}]`.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the structure is malformed, any
/// capability fails validation, or a `firstMatch` key shadows an
/// `alwaysMatch` key.
pub fn process_capabilities(params: &Value, host: &HostInfo) -> Result<Map<String, Value>> {
    let capabilities = params.get("capabilities").unwrap_or(&Value::Null);
    let capabilities = assert::object(capabilities, || {
        format!(
            "Expected \"capabilities\" to be an object, got {}",
            pprint(capabilities)
        )
    })?;

    let required = match capabilities.get("alwaysMatch") {
        Some(always_match) => validate_capabilities(always_match, host)?,
        None => Map::new(),
    };

    let default_first_match = Value::Array(vec![Value::Object(Map::new())]);
    let first_match = capabilities
        .get("firstMatch")
        .unwrap_or(&default_first_match);
    let first_match = assert::non_empty_array(first_match, || {
        format!(
            "Expected \"firstMatch\" to be a non-empty array, got {}",
            pprint(first_match)
        )
    })?;

    let validated = first_match
        .iter()
        .map(|entry| validate_capabilities(entry, host))
        .collect::<Result<Vec<_>>>()?;

    let merged = validated
        .iter()
        .map(|entry| merge_capabilities(&required, Some(entry)))
        .collect::<Result<Vec<_>>>()?;

    // Candidates are not matched against the host; the first one wins.
    debug!(
        candidates = merged.len(),
        always_match = required.len(),
        selected = 0,
        "Merged capability candidates"
    );

    merged
        .into_iter()
        .next()
        .ok_or_else(|| Error::invalid_argument("No capability candidates to match"))
}

// ============================================================================
// Tests
// ============================================================================
