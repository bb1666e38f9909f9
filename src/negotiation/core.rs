//! Capability negotiation facade.
//!
//! The [`Negotiator`] binds a host and a protocol mode to the processing
//! functions so a transport can handle New Session requests without
//! threading [`HostInfo`] through every call.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::{HostInfo, Negotiator};
//! use serde_json::json;
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let negotiator = Negotiator::builder()
//!     .host(HostInfo::new("Firefox", "128.0"))
//!     .build()?;
//!
//! let session = negotiator.new_session_capabilities(&json!({
//!     "capabilities": {
//!         "alwaysMatch": { "pageLoadStrategy": "eager" },
//!     }
//! }))?;
//! assert_eq!(session.to_json()["pageLoadStrategy"], "eager");
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::capabilities::{Capabilities, CapabilityValue, registry};
use crate::error::Result;
use crate::host::HostInfo;

use super::builder::NegotiatorBuilder;
use super::process::process_capabilities;

// ============================================================================
// Types
// ============================================================================

/// Shared negotiator state.
struct NegotiatorInner {
    /// Platform the sessions run on.
    host: HostInfo,
    /// Whether sessions use WebDriver BiDi.
    bidi: bool,
}

// ============================================================================
// Negotiator
// ============================================================================

/// Capability negotiator for one host.
///
/// Cheap to clone; clones share the same configuration.
#[derive(Clone)]
pub struct Negotiator {
    inner: Arc<NegotiatorInner>,
}

impl fmt::Debug for Negotiator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Negotiator")
            .field("browser", &self.inner.host.browser_name())
            .field("version", &self.inner.host.app_version)
            .field("bidi", &self.inner.bidi)
            .finish()
    }
}

// ============================================================================
// Negotiator - Constructors
// ============================================================================

impl Negotiator {
    /// Creates a configuration builder.
    #[inline]
    #[must_use]
    pub fn builder() -> NegotiatorBuilder {
        NegotiatorBuilder::new()
    }

    pub(crate) fn new(host: HostInfo, bidi: bool) -> Self {
        debug!(
            browser = %host.browser_name(),
            platform = %host.platform_name(),
            bidi,
            "Negotiator created"
        );
        Self {
            inner: Arc::new(NegotiatorInner { host, bidi }),
        }
    }
}

// ============================================================================
// Negotiator - Accessors
// ============================================================================

impl Negotiator {
    /// Returns the host platform information.
    #[inline]
    #[must_use]
    pub fn host(&self) -> &HostInfo {
        &self.inner.host
    }

    /// Returns `true` if sessions use WebDriver BiDi.
    #[inline]
    #[must_use]
    pub fn is_bidi(&self) -> bool {
        self.inner.bidi
    }
}

// ============================================================================
// Negotiator - Operations
// ============================================================================

impl Negotiator {
    /// Validates a single capability against this host.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`](crate::Error::InvalidArgument) if
    /// the value is rejected.
    pub fn validate(&self, name: &str, value: &Value) -> Result<CapabilityValue> {
        registry::validate(name, value, &self.inner.host)
    }

    /// Processes New Session parameters into the matched capability set.
    ///
    /// # Errors
    ///
    /// See [`process_capabilities`].
    pub fn process(&self, params: &Value) -> Result<Map<String, Value>> {
        process_capabilities(params, &self.inner.host)
    }

    /// Processes a raw New Session request body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`](crate::Error::Json) if `body` is not valid
    /// JSON, otherwise see [`process_capabilities`].
    pub fn process_body(&self, body: &str) -> Result<Map<String, Value>> {
        let params: Value = serde_json::from_str(body)?;
        self.process(&params)
    }

    /// Processes New Session parameters and builds the session map.
    ///
    /// The proxy in the result is parsed but not applied; call
    /// [`ProxyConfiguration::init`](crate::ProxyConfiguration::init) or
    /// [`ProxyConfiguration::apply`](crate::ProxyConfiguration::apply) with
    /// the host's preference store to activate it.
    ///
    /// # Errors
    ///
    /// See [`process_capabilities`] and [`Capabilities::from_json`].
    pub fn new_session_capabilities(&self, params: &Value) -> Result<Capabilities> {
        let matched = self.process(params)?;
        let capabilities =
            Capabilities::from_json(&Value::Object(matched), &self.inner.host, self.inner.bidi)?;

        debug!(
            entries = capabilities.len(),
            bidi = self.inner.bidi,
            "Session capabilities ready"
        );
        Ok(capabilities)
    }
}

// ============================================================================
// Tests
// ============================================================================
