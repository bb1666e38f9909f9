//! Typed capability values.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::prompt::UserPromptHandler;
use super::proxy::ProxyConfiguration;
use super::timeouts::Timeouts;

// ============================================================================
// PageLoadStrategy
// ============================================================================

/// When navigation commands return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageLoadStrategy {
    /// Return immediately.
    None,

    /// Return when the document reaches the `interactive` ready state.
    Eager,

    /// Return when the document reaches the `complete` ready state.
    #[default]
    Normal,
}

impl PageLoadStrategy {
    /// Every strategy, in wire-name order.
    pub const ALL: [Self; 3] = [Self::None, Self::Eager, Self::Normal];

    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Eager => "eager",
            Self::Normal => "normal",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

// ============================================================================
// CapabilityValue
// ============================================================================

/// Value held by a capability entry.
///
/// The typed variants carry values with their own serialization; `Json`
/// carries everything else (booleans, strings, vendor extensions).
#[derive(Debug, Clone, PartialEq)]
pub enum CapabilityValue {
    /// Plain JSON value, `null` included.
    Json(Value),

    /// `pageLoadStrategy`.
    PageLoadStrategy(PageLoadStrategy),

    /// `timeouts`.
    Timeouts(Timeouts),

    /// `proxy`.
    Proxy(ProxyConfiguration),

    /// `unhandledPromptBehavior`.
    PromptHandler(UserPromptHandler),
}

impl CapabilityValue {
    /// Returns `true` for a JSON `null`.
    #[inline]
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }

    /// Returns the boolean value, if this is a JSON boolean.
    #[inline]
    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Json(value) => value.as_bool(),
            _ => None,
        }
    }

    /// Returns the string value, if this is a JSON string.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Json(value) => value.as_str(),
            _ => None,
        }
    }

    /// Converts to JSON using each typed value's own serialization.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Json(value) => value.clone(),
            Self::PageLoadStrategy(strategy) => Value::from(strategy.as_str()),
            Self::Timeouts(timeouts) => timeouts.to_json(),
            Self::Proxy(proxy) => proxy.to_json(),
            Self::PromptHandler(handler) => handler.to_json(),
        }
    }
}

// ============================================================================
// Trait Implementations
// ============================================================================

impl From<Value> for CapabilityValue {
    #[inline]
    fn from(value: Value) -> Self {
        Self::Json(value)
    }
}

impl From<bool> for CapabilityValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Json(Value::Bool(value))
    }
}

impl From<&str> for CapabilityValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::Json(Value::from(value))
    }
}

impl From<String> for CapabilityValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::Json(Value::String(value))
    }
}

impl From<PageLoadStrategy> for CapabilityValue {
    #[inline]
    fn from(value: PageLoadStrategy) -> Self {
        Self::PageLoadStrategy(value)
    }
}

impl From<Timeouts> for CapabilityValue {
    #[inline]
    fn from(value: Timeouts) -> Self {
        Self::Timeouts(value)
    }
}

impl From<ProxyConfiguration> for CapabilityValue {
    #[inline]
    fn from(value: ProxyConfiguration) -> Self {
        Self::Proxy(value)
    }
}

impl From<UserPromptHandler> for CapabilityValue {
    #[inline]
    fn from(value: UserPromptHandler) -> Self {
        Self::PromptHandler(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
