//! Per-capability validators.
//!
//! Each well-known capability name maps to a [`Validator`]. Names that are
//! not in the table fall through to the extension rule: a colon-prefixed
//! name with a vendor prefix other than `moz` is passed through unchanged,
//! anything else is rejected.

// ============================================================================
// Imports
// ============================================================================

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::trace;

use crate::assert;
use crate::error::{Error, Result};
use crate::format::{pprint, truncate};
use crate::host::HostInfo;

use super::prompt::UserPromptHandler;
use super::proxy::ProxyConfiguration;
use super::timeouts::Timeouts;
use super::value::{CapabilityValue, PageLoadStrategy};

// ============================================================================
// Types
// ============================================================================

/// Validates and coerces one capability value.
///
/// Receives the capability name (for messages), the raw value, and the
/// host the session runs on.
pub type Validator = fn(&str, &Value, &HostInfo) -> Result<CapabilityValue>;

// ============================================================================
// Constants
// ============================================================================

/// Vendor prefix reserved for this browser. Unknown `moz:` names are errors.
const VENDOR_PREFIX: &str = "moz";

// ============================================================================
// Registry
// ============================================================================

static VALIDATORS: LazyLock<FxHashMap<&'static str, Validator>> = LazyLock::new(|| {
    let entries: [(&'static str, Validator); 20] = [
        ("acceptInsecureCerts", boolean),
        ("browserName", string),
        ("browserVersion", string),
        ("platformName", string),
        ("pageLoadStrategy", page_load_strategy),
        ("proxy", proxy),
        ("setWindowRect", set_window_rect),
        ("strictFileInteractability", boolean),
        ("timeouts", timeouts),
        ("unhandledPromptBehavior", unhandled_prompt_behavior),
        ("webSocketUrl", web_socket_url),
        ("webauthn:virtualAuthenticators", boolean),
        ("webauthn:extension:uvm", boolean),
        ("webauthn:extension:largeBlob", boolean),
        ("webauthn:extension:credBlob", boolean),
        ("webauthn:extension:prf", boolean),
        ("moz:firefoxOptions", object),
        ("moz:accessibilityChecks", boolean),
        ("moz:webdriverClick", boolean),
        ("moz:windowless", windowless),
    ];
    entries.into_iter().collect()
});

/// Returns the validator registered for `name`.
#[must_use]
pub fn validator(name: &str) -> Option<Validator> {
    VALIDATORS.get(name).copied()
}

/// Returns `true` if `name` has a dedicated validator.
#[inline]
#[must_use]
pub fn is_known(name: &str) -> bool {
    VALIDATORS.contains_key(name)
}

/// Validates one capability without side effects.
///
/// `null` always passes through. Returns the coerced value.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if the value breaks the rule for
/// `name`, or `name` is neither known nor a non-`moz` extension.
pub fn validate(name: &str, value: &Value, host: &HostInfo) -> Result<CapabilityValue> {
    if value.is_null() {
        return Ok(CapabilityValue::Json(Value::Null));
    }

    if let Some(validate) = validator(name) {
        trace!(name, "Validating capability");
        return validate(name, value, host);
    }

    match name.split_once(':') {
        Some((prefix, _)) if prefix != VENDOR_PREFIX => {
            trace!(name, "Passing through extension capability");
            Ok(CapabilityValue::Json(value.clone()))
        }
        _ => Err(Error::invalid_argument(format!(
            "{} is not the name of a known capability or extension capability",
            truncate(name)
        ))),
    }
}

// ============================================================================
// Validators
// ============================================================================

fn boolean(name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    expect_bool(name, value).map(CapabilityValue::from)
}

fn string(name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    assert::string(value, || {
        format!("Expected \"{name}\" to be a string, got {}", pprint(value))
    })
    .map(CapabilityValue::from)
}

fn object(name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    assert::object(value, || {
        format!("Expected \"{name}\" to be an object, got {}", pprint(value))
    })?;
    Ok(CapabilityValue::Json(value.clone()))
}

fn page_load_strategy(name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    let s = assert::string(value, || {
        format!("Expected \"{name}\" to be a string, got {}", pprint(value))
    })?;
    PageLoadStrategy::parse(s)
        .map(CapabilityValue::PageLoadStrategy)
        .ok_or_else(|| {
            Error::invalid_argument(format!("Unknown page load strategy: {}", truncate(s)))
        })
}

fn proxy(_name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    ProxyConfiguration::from_json(value).map(CapabilityValue::Proxy)
}

fn timeouts(_name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    Timeouts::from_json(value).map(CapabilityValue::Timeouts)
}

fn unhandled_prompt_behavior(
    _name: &str,
    value: &Value,
    _host: &HostInfo,
) -> Result<CapabilityValue> {
    UserPromptHandler::from_json(value).map(CapabilityValue::PromptHandler)
}

fn set_window_rect(name: &str, value: &Value, host: &HostInfo) -> Result<CapabilityValue> {
    let enabled = expect_bool(name, value)?;

    if !host.is_android() && !enabled {
        return Err(Error::invalid_argument("setWindowRect cannot be disabled"));
    }
    if host.is_android() && enabled {
        return Err(Error::invalid_argument(
            "setWindowRect is only supported on desktop",
        ));
    }
    Ok(CapabilityValue::from(enabled))
}

fn web_socket_url(name: &str, value: &Value, _host: &HostInfo) -> Result<CapabilityValue> {
    if !expect_bool(name, value)? {
        return Err(Error::invalid_argument(format!(
            "Expected \"{name}\" to be true, got {}",
            pprint(value)
        )));
    }
    Ok(CapabilityValue::from(true))
}

fn windowless(name: &str, value: &Value, host: &HostInfo) -> Result<CapabilityValue> {
    let enabled = expect_bool(name, value)?;

    if enabled && !host.is_mac() {
        return Err(Error::invalid_argument(
            "moz:windowless only supported on MacOS",
        ));
    }
    Ok(CapabilityValue::from(enabled))
}

// ============================================================================
// Private Helpers
// ============================================================================

fn expect_bool(name: &str, value: &Value) -> Result<bool> {
    assert::boolean(value, || {
        format!("Expected \"{name}\" to be a boolean, got {}", pprint(value))
    })
}

// ============================================================================
// Tests
// ============================================================================
