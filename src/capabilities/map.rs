//! Session capability map.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::{Capabilities, HostInfo};
//! use serde_json::json;
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let host = HostInfo::new("Firefox", "128.0").with_os("Linux", "6.1");
//! let caps = Capabilities::from_json(
//!     &json!({ "acceptInsecureCerts": true, "pageLoadStrategy": "eager" }),
//!     &host,
//!     false,
//! )?;
//!
//! let json = caps.to_json();
//! assert_eq!(json["browserName"], "firefox");
//! assert_eq!(json["pageLoadStrategy"], "eager");
//! assert_eq!(json["proxy"], json!({}));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::assert;
use crate::error::{Error, Result};
use crate::format::pprint;
use crate::host::HostInfo;

use super::marshal::marshal;
use super::prompt::UserPromptHandler;
use super::proxy::ProxyConfiguration;
use super::registry;
use super::timeouts::Timeouts;
use super::value::{CapabilityValue, PageLoadStrategy};

// ============================================================================
// Constants
// ============================================================================

/// Capabilities that only apply to WebDriver classic sessions.
///
/// A BiDi session ignores these entirely.
pub const WEBDRIVER_CLASSIC_CAPABILITIES: [&str; 12] = [
    "pageLoadStrategy",
    "strictFileInteractability",
    "timeouts",
    "webSocketUrl",
    // Vendor
    "moz:accessibilityChecks",
    "moz:firefoxOptions",
    "moz:webdriverClick",
    // Extensions
    "webauthn:extension:credBlob",
    "webauthn:extension:largeBlob",
    "webauthn:extension:prf",
    "webauthn:extension:uvm",
    "webauthn:virtualAuthenticators",
];

/// Returns `true` if `name` only applies to WebDriver classic sessions.
#[inline]
#[must_use]
pub fn is_classic_only(name: &str) -> bool {
    WEBDRIVER_CLASSIC_CAPABILITIES.contains(&name)
}

// ============================================================================
// Capabilities
// ============================================================================

/// Capabilities of one session, in insertion order.
///
/// Seeded with defaults at construction and mutated only while the
/// session is being created.
#[derive(Debug, Clone, PartialEq)]
pub struct Capabilities {
    entries: IndexMap<String, CapabilityValue>,
    bidi: bool,
}

// ============================================================================
// Capabilities - Constructors
// ============================================================================

impl Capabilities {
    /// Creates the default capabilities for a session.
    ///
    /// # Arguments
    ///
    /// * `host` - Platform the session runs on
    /// * `bidi` - `true` for a WebDriver BiDi session, which omits the
    ///   classic-only defaults
    #[must_use]
    pub fn new(host: &HostInfo, bidi: bool) -> Self {
        let mut entries: IndexMap<String, CapabilityValue> = IndexMap::new();
        let mut put = |key: &str, value: CapabilityValue| {
            entries.insert(key.to_string(), value);
        };

        // Shared by both protocols
        put("acceptInsecureCerts", false.into());
        put("browserName", host.browser_name().into());
        put("browserVersion", host.app_version.as_str().into());
        put("platformName", host.platform_name().into());
        put("proxy", ProxyConfiguration::new().into());
        put("unhandledPromptBehavior", UserPromptHandler::new().into());
        put("userAgent", host.user_agent.as_str().into());

        put("moz:buildID", host.build_id.as_str().into());
        put("moz:headless", host.headless.into());
        put("moz:platformVersion", host.os_version.as_str().into());
        put("moz:processID", Value::from(host.process_id).into());
        put("moz:profile", host.profile_display().into());
        put(
            "moz:shutdownTimeout",
            host.shutdown_timeout.map_or(Value::Null, Value::from).into(),
        );

        if !bidi {
            put("pageLoadStrategy", PageLoadStrategy::Normal.into());
            put("timeouts", Timeouts::default().into());
            put("setWindowRect", (!host.is_android()).into());
            put("strictFileInteractability", false.into());

            put("moz:accessibilityChecks", false.into());
            put("moz:webdriverClick", true.into());
            put("moz:windowless", false.into());
        }

        Self { entries, bidi }
    }

    /// Builds session capabilities from a matched capability set.
    ///
    /// Starts from the defaults, skips classic-only keys in a BiDi session
    /// and `null` values, and stores every other entry after validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `json` is not an object or an
    /// entry fails validation.
    pub fn from_json(json: &Value, host: &HostInfo, bidi: bool) -> Result<Self> {
        let mut capabilities = Self::new(host, bidi);
        if json.is_null() {
            return Ok(capabilities);
        }

        let entries = assert::object(json, || {
            format!("Expected \"capabilities\" to be an object, got {}", pprint(json))
        })?;

        for (name, value) in entries {
            if bidi && is_classic_only(name) {
                debug!(name = %name, "Ignoring classic capability for BiDi session");
                continue;
            }

            let value = registry::validate(name, value, host)?;
            if value.is_null() {
                continue;
            }
            capabilities.set(name.as_str(), value)?;
        }

        Ok(capabilities)
    }
}

// ============================================================================
// Capabilities - Accessors
// ============================================================================

impl Capabilities {
    /// Returns `true` if this is a WebDriver BiDi session.
    #[inline]
    #[must_use]
    pub const fn is_bidi(&self) -> bool {
        self.bidi
    }

    /// Returns the value of `key`.
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&CapabilityValue> {
        self.entries.get(key)
    }

    /// Returns `true` if `key` is present.
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Returns the number of entries.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CapabilityValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the session timeouts. `None` in a BiDi session.
    #[must_use]
    pub fn timeouts(&self) -> Option<&Timeouts> {
        match self.entries.get("timeouts") {
            Some(CapabilityValue::Timeouts(timeouts)) => Some(timeouts),
            _ => None,
        }
    }

    /// Returns the proxy configuration.
    #[must_use]
    pub fn proxy(&self) -> Option<&ProxyConfiguration> {
        match self.entries.get("proxy") {
            Some(CapabilityValue::Proxy(proxy)) => Some(proxy),
            _ => None,
        }
    }

    /// Returns the proxy configuration mutably, for `init()`/`destroy()`.
    #[must_use]
    pub fn proxy_mut(&mut self) -> Option<&mut ProxyConfiguration> {
        match self.entries.get_mut("proxy") {
            Some(CapabilityValue::Proxy(proxy)) => Some(proxy),
            _ => None,
        }
    }

    /// Returns the unhandled prompt behavior.
    #[must_use]
    pub fn unhandled_prompt_behavior(&self) -> Option<&UserPromptHandler> {
        match self.entries.get("unhandledPromptBehavior") {
            Some(CapabilityValue::PromptHandler(handler)) => Some(handler),
            _ => None,
        }
    }

    /// Returns the page load strategy. `None` in a BiDi session.
    #[must_use]
    pub fn page_load_strategy(&self) -> Option<PageLoadStrategy> {
        match self.entries.get("pageLoadStrategy") {
            Some(CapabilityValue::PageLoadStrategy(strategy)) => Some(*strategy),
            _ => None,
        }
    }
}

// ============================================================================
// Capabilities - Mutation
// ============================================================================

impl Capabilities {
    /// Sets `key` to `value`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Type`] if `timeouts` is given anything but
    /// [`CapabilityValue::Timeouts`], or `proxy` anything but
    /// [`CapabilityValue::Proxy`].
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<CapabilityValue>) -> Result<()> {
        let key = key.into();
        let value = value.into();

        match (key.as_str(), &value) {
            ("timeouts", CapabilityValue::Timeouts(_)) | ("proxy", CapabilityValue::Proxy(_)) => {}
            ("timeouts", _) => {
                return Err(Error::type_error("\"timeouts\" must hold a Timeouts value"));
            }
            ("proxy", _) => {
                return Err(Error::type_error(
                    "\"proxy\" must hold a ProxyConfiguration value",
                ));
            }
            _ => {}
        }

        self.entries.insert(key, value);
        Ok(())
    }
}

// ============================================================================
// Capabilities - Serialization
// ============================================================================

impl Capabilities {
    /// Marshals the capabilities for the session-creation response.
    ///
    /// `null` entries and empty objects are dropped, except that `proxy`
    /// and `unhandledPromptBehavior` are always present, as is `timeouts`
    /// whenever the session has them.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out: Map<String, Value> =
            marshal(self.entries.iter().map(|(k, v)| (k.as_str(), v.to_json())));

        if !out.contains_key("proxy") {
            out.insert("proxy".to_string(), Value::Object(Map::new()));
        }
        if let Some(timeouts) = self.timeouts() {
            out.insert("timeouts".to_string(), timeouts.to_json());
        }
        if let Some(handler) = self.unhandled_prompt_behavior() {
            out.insert("unhandledPromptBehavior".to_string(), handler.to_json());
        }

        Value::Object(out)
    }

    /// Validates one capability without side effects.
    ///
    /// # Errors
    ///
    /// See [`registry::validate`].
    #[inline]
    pub fn validate(name: &str, value: &Value, host: &HostInfo) -> Result<CapabilityValue> {
        registry::validate(name, value, host)
    }
}

impl Serialize for Capabilities {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================
