//! Preference values.
//!
//! Firefox preferences are booleans, 32-bit integers, or strings. The
//! [`Display`](std::fmt::Display) form matches `user.js` literal syntax,
//! which is what log fields show.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::prefs::{PreferenceKind, PreferenceValue};
//!
//! let value = PreferenceValue::from("proxy.example.com");
//! assert_eq!(value.kind(), PreferenceKind::String);
//! assert_eq!(value.to_string(), "\"proxy.example.com\"");
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// PreferenceKind
// ============================================================================

/// Type tag of a preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PreferenceKind {
    /// Boolean preference.
    Bool,

    /// Integer preference.
    Int,

    /// String preference.
    String,
}

impl PreferenceKind {
    /// Returns the lowercase name used in log output.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::String => "string",
        }
    }
}

// ============================================================================
// PreferenceValue
// ============================================================================

/// A preference value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PreferenceValue {
    /// Boolean value (true/false).
    Bool(bool),

    /// Integer value.
    Int(i32),

    /// String value.
    String(String),
}

// ============================================================================
// PreferenceValue - Methods
// ============================================================================

impl PreferenceValue {
    /// Returns the type tag of this value.
    #[inline]
    #[must_use]
    pub const fn kind(&self) -> PreferenceKind {
        match self {
            Self::Bool(_) => PreferenceKind::Bool,
            Self::Int(_) => PreferenceKind::Int,
            Self::String(_) => PreferenceKind::String,
        }
    }

    /// Returns the integer value, if this is an integer preference.
    #[inline]
    #[must_use]
    pub const fn as_int(&self) -> Option<i32> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the string value, if this is a string preference.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Formats the value as a `user.js` literal.
    ///
    /// - Booleans: `true` or `false`
    /// - Integers: numeric literal
    /// - Strings: quoted and escaped
    #[must_use]
    pub fn to_js_string(&self) -> String {
        match self {
            Self::Bool(b) => b.to_string(),
            Self::Int(i) => i.to_string(),
            Self::String(s) => format!("\"{}\"", escape_js_string(s)),
        }
    }
}

// ============================================================================
// PreferenceValue - Trait Implementations
// ============================================================================

impl fmt::Display for PreferenceValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_js_string())
    }
}

impl From<bool> for PreferenceValue {
    #[inline]
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i32> for PreferenceValue {
    #[inline]
    fn from(value: i32) -> Self {
        Self::Int(value)
    }
}

impl From<String> for PreferenceValue {
    #[inline]
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for PreferenceValue {
    #[inline]
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// Escapes special characters for JavaScript strings.
fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

// ============================================================================
// Tests
// ============================================================================
