//! Capability negotiation for New Session requests.
//!
//! # Components
//!
//! | Item | Description |
//! |------|-------------|
//! | [`Negotiator`] | Host-bound facade over the processing functions |
//! | [`NegotiatorBuilder`] | Fluent configuration builder |
//! | [`validate_capabilities`] | Validates one capabilities object |
//! | [`merge_capabilities`] | Merges a `firstMatch` entry into `alwaysMatch` |
//! | [`process_capabilities`] | Full validate, merge and select pipeline |
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::{HostInfo, negotiation::process_capabilities};
//! use serde_json::json;
//!
//! let host = HostInfo::new("Firefox", "128.0");
//! let matched = process_capabilities(
//!     &json!({ "capabilities": {
//!         "alwaysMatch": { "acceptInsecureCerts": true },
//!         "firstMatch": [{ "browserName": "firefox" }, {}],
//!     }}),
//!     &host,
//! )
//! .unwrap();
//!
//! assert_eq!(matched["browserName"], "firefox");
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for negotiator configuration.
pub mod builder;

/// Core negotiator implementation.
pub mod core;

/// Validate, merge and select phases.
pub mod process;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::NegotiatorBuilder;
pub use core::Negotiator;
pub use process::{
    DEFERRED_CAPABILITIES, merge_capabilities, process_capabilities, validate_capabilities,
};
