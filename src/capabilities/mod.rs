//! Capability data model.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Capabilities`] | Ordered, default-populated capability map of a session |
//! | [`Timeouts`] | Implicit, page load and script timeouts |
//! | [`ProxyConfiguration`] | Proxy strategy and its preference side effects |
//! | [`UserPromptHandler`] | Unhandled prompt behavior |
//! | [`CapabilityValue`] | Typed value stored in the map |
//!
//! Per-key validation lives in [`registry`]; [`marshal()`] produces the
//! minimal JSON form shared by every value's `to_json`.

// ============================================================================
// Submodules
// ============================================================================

/// Session capability map.
pub mod map;

/// Minimal JSON marshalling.
pub mod marshal;

/// Unhandled prompt behavior.
pub mod prompt;

/// Proxy configuration and preference application.
pub mod proxy;

/// Per-capability validators.
pub mod registry;

/// Session timeouts.
pub mod timeouts;

/// Typed capability values.
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use map::{Capabilities, WEBDRIVER_CLASSIC_CAPABILITIES, is_classic_only};
pub use marshal::marshal;
pub use prompt::{PromptHandler, PromptHandlerConfiguration, PromptType, UserPromptHandler};
pub use proxy::{AppliedProxy, ProxyConfiguration, ProxyType, from_host};
pub use registry::{Validator, validate};
pub use timeouts::Timeouts;
pub use value::{CapabilityValue, PageLoadStrategy};
