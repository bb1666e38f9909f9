//! Firefox Capabilities - WebDriver capability negotiation.
//!
//! This library turns the capabilities a WebDriver client sends with a
//! New Session request into the validated capability set of a Firefox
//! session, and applies the requested proxy through browser preferences.
//!
//! # Architecture
//!
//! Negotiation is a pure pipeline followed by one side-effecting step:
//!
//! - **Process**: validate `alwaysMatch` and each `firstMatch` entry,
//!   merge, select the first candidate
//! - **Build**: turn the matched set into a default-populated
//!   [`Capabilities`] map
//! - **Apply**: write the proxy preferences through a [`PreferenceStore`]
//!   and restore them when the session ends
//!
//! Key design principles:
//!
//! - Host facts come from [`HostInfo`], never from globals
//! - Preferences are reached only through the [`PreferenceStore`] port
//! - Every client error is [`Error::InvalidArgument`]
//!
//! # Quick Start
//!
//! ```
//! use firefox_capabilities::{HostInfo, MemoryPreferences, Negotiator, Result};
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let negotiator = Negotiator::builder()
//!         .host(HostInfo::new("Firefox", "128.0"))
//!         .build()?;
//!
//!     let mut session = negotiator.new_session_capabilities(&json!({
//!         "capabilities": {
//!             "alwaysMatch": {
//!                 "proxy": { "proxyType": "manual", "httpProxy": "proxy.example:3128" },
//!             },
//!         }
//!     }))?;
//!
//!     let prefs = MemoryPreferences::new();
//!     if let Some(proxy) = session.proxy_mut() {
//!         proxy.init(&prefs)?;
//!         // ... session runs ...
//!         proxy.destroy(&prefs)?;
//!     }
//!
//!     println!("{}", session.to_json());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`capabilities`] | Capability types: [`Capabilities`], [`Timeouts`], [`ProxyConfiguration`] |
//! | [`negotiation`] | [`Negotiator`] and the processing functions |
//! | [`host`] | Host platform information |
//! | [`prefs`] | Preference store port and in-memory adapter |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`assert`] | Typed JSON assertions (internal) |
//! | [`format`] | Bounded value formatting for messages (internal) |

// ============================================================================
// Modules
// ============================================================================

/// Typed JSON assertions.
///
/// Internal module producing [`Error::InvalidArgument`] on mismatch.
pub mod assert;

/// Capability data model.
///
/// - [`Capabilities`] - Session capability map
/// - [`Timeouts`] - Session timeouts
/// - [`ProxyConfiguration`] - Proxy and its preference side effects
/// - [`UserPromptHandler`] - Unhandled prompt behavior
pub mod capabilities;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Bounded formatting of JSON values for error messages.
pub mod format;

/// Host platform information.
pub mod host;

/// Capability negotiation.
///
/// Use [`Negotiator::builder()`] to create a configured negotiator.
pub mod negotiation;

/// Browser preference access.
pub mod prefs;

// ============================================================================
// Re-exports
// ============================================================================

// Capability types
pub use capabilities::{
    AppliedProxy, Capabilities, CapabilityValue, PageLoadStrategy, PromptHandler,
    PromptHandlerConfiguration, PromptType, ProxyConfiguration, ProxyType, Timeouts,
    UserPromptHandler,
};

// Negotiation types
pub use negotiation::{
    Negotiator, NegotiatorBuilder, merge_capabilities, process_capabilities,
    validate_capabilities,
};

// Error types
pub use error::{Error, Result};

// Host and preference types
pub use host::HostInfo;
pub use prefs::{MemoryPreferences, PreferenceKind, PreferenceStore, PreferenceValue};
