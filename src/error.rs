//! Error types for capability negotiation.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```
//! use firefox_capabilities::{HostInfo, Negotiator, Result};
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let negotiator = Negotiator::builder()
//!         .host(HostInfo::new("Firefox", "128.0"))
//!         .build()?;
//!
//!     let matched = negotiator.process(&json!({
//!         "capabilities": { "alwaysMatch": { "acceptInsecureCerts": true } }
//!     }))?;
//!     assert_eq!(matched["acceptInsecureCerts"], true);
//!     Ok(())
//! }
//! # example().unwrap();
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Configuration | [`Error::Config`] |
//! | Client input | [`Error::InvalidArgument`] |
//! | Programmer misuse | [`Error::Type`], [`Error::InvalidState`] |
//! | Host environment | [`Error::Preference`] |
//! | External | [`Error::Json`] |
//!
//! [`Error::InvalidArgument`] and [`Error::Json`] (a malformed request body)
//! are expected to reach a WebDriver client. The other variants indicate a
//! bug in the caller or a broken host.

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Configuration error.
    ///
    /// Returned when negotiator configuration is invalid.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error.
        message: String,
    },

    // ========================================================================
    // Client Errors
    // ========================================================================
    /// Invalid argument in the capabilities payload.
    ///
    /// Returned when a capability has the wrong type, an unknown name,
    /// or a value the host cannot honour. Aborts the whole request.
    #[error("Invalid argument: {message}")]
    InvalidArgument {
        /// Description naming the offending capability and value.
        message: String,
    },

    // ========================================================================
    // Programmer Errors
    // ========================================================================
    /// A typed capability slot was given a value of the wrong shape.
    #[error("Type error: {message}")]
    Type {
        /// Description of the mismatch.
        message: String,
    },

    /// An operation was called in a state that does not allow it.
    #[error("Invalid state: {message}")]
    InvalidState {
        /// Description of the state violation.
        message: String,
    },

    // ========================================================================
    // Host Errors
    // ========================================================================
    /// The preference store rejected a read or write.
    ///
    /// Fatal at session start: proxy settings are never left half-applied.
    #[error("Preference error on {name}: {message}")]
    Preference {
        /// Preference name.
        name: String,
        /// Description of the failure.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// Request body is not valid JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a configuration error.
    #[inline]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an invalid argument error.
    #[inline]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /// Creates a type error.
    #[inline]
    pub fn type_error(message: impl Into<String>) -> Self {
        Self::Type {
            message: message.into(),
        }
    }

    /// Creates an invalid state error.
    #[inline]
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
        }
    }

    /// Creates a preference error.
    #[inline]
    pub fn preference(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Preference {
            name: name.into(),
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is an invalid argument error.
    #[inline]
    #[must_use]
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }

    /// Returns `true` if this error indicates a caller bug rather than bad input.
    #[inline]
    #[must_use]
    pub fn is_programmer_error(&self) -> bool {
        matches!(self, Self::Type { .. } | Self::InvalidState { .. })
    }

    /// Returns the WebDriver error code for this error.
    ///
    /// Transports use this for the `error` field of the wire response.
    #[inline]
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidArgument { .. } | Self::Json(_) => "invalid argument",
            _ => "unknown error",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
