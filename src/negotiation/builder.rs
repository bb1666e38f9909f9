//! Builder pattern for negotiator configuration.
//!
//! Provides a fluent API for configuring and creating [`Negotiator`] instances.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::{HostInfo, Negotiator};
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let negotiator = Negotiator::builder()
//!     .host(HostInfo::new("Firefox", "128.0").with_headless(true))
//!     .bidi(true)
//!     .build()?;
//! assert!(negotiator.is_bidi());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use crate::error::{Error, Result};
use crate::host::HostInfo;

use super::core::Negotiator;

// ============================================================================
// NegotiatorBuilder
// ============================================================================

/// Builder for configuring a [`Negotiator`] instance.
///
/// Use [`Negotiator::builder()`] to create a new builder.
#[derive(Debug, Default, Clone)]
pub struct NegotiatorBuilder {
    /// Platform the sessions run on.
    host: Option<HostInfo>,
    /// Whether sessions use WebDriver BiDi.
    bidi: bool,
}

// ============================================================================
// NegotiatorBuilder Implementation
// ============================================================================

impl NegotiatorBuilder {
    /// Creates a new builder with no configuration.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the host platform information.
    #[inline]
    #[must_use]
    pub fn host(mut self, host: HostInfo) -> Self {
        self.host = Some(host);
        self
    }

    /// Selects WebDriver BiDi (`true`) or classic (`false`, default) sessions.
    #[inline]
    #[must_use]
    pub fn bidi(mut self, bidi: bool) -> Self {
        self.bidi = bidi;
        self
    }

    /// Builds the negotiator with validation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if no host is set or the host has an
    /// empty application name.
    pub fn build(self) -> Result<Negotiator> {
        let host = self.validate_host()?;
        Ok(Negotiator::new(host, self.bidi))
    }
}

// ============================================================================
// Validation
// ============================================================================

impl NegotiatorBuilder {
    /// Validates the host configuration.
    fn validate_host(&self) -> Result<HostInfo> {
        let host = self.host.clone().ok_or_else(|| {
            Error::config(
                "Host information is required. Use .host() to set it.\n\
                 Example: Negotiator::builder().host(HostInfo::new(\"Firefox\", \"128.0\"))",
            )
        })?;

        if host.app_name.trim().is_empty() {
            return Err(Error::config("Host application name must not be empty"));
        }

        Ok(host)
    }
}

// ============================================================================
// Tests
// ============================================================================
