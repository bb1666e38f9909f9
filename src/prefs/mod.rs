//! Preference store port.
//!
//! [`ProxyConfiguration`](crate::capabilities::ProxyConfiguration) is the
//! only component that mutates browser preferences. It does so through the
//! [`PreferenceStore`] trait so the stash-and-restore logic can be tested
//! without a real preference backend.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::prefs::{MemoryPreferences, PreferenceStore};
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let prefs = MemoryPreferences::new();
//! prefs.set_int("network.proxy.type", 1)?;
//! assert_eq!(prefs.get_int("network.proxy.type"), Some(1));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::error::Result;

// ============================================================================
// Submodules
// ============================================================================

/// Preference value types.
pub mod value;

// ============================================================================
// Re-exports
// ============================================================================

pub use value::{PreferenceKind, PreferenceValue};

// ============================================================================
// PreferenceStore
// ============================================================================

/// Process-wide preference storage.
///
/// Implementations take `&self` and synchronise internally; the store is
/// shared by every session in the host.
pub trait PreferenceStore: Send + Sync {
    /// Returns the current user value of `name`, or `None` if unset.
    fn get(&self, name: &str) -> Option<PreferenceValue>;

    /// Writes `value` to `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Preference`](crate::Error::Preference) if the
    /// backend rejects the write.
    fn set(&self, name: &str, value: PreferenceValue) -> Result<()>;

    /// Removes any user value of `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Preference`](crate::Error::Preference) if the
    /// backend rejects the change.
    fn clear(&self, name: &str) -> Result<()>;

    /// Returns the integer value of `name`, if set and an integer.
    fn get_int(&self, name: &str) -> Option<i32> {
        self.get(name).and_then(|v| v.as_int())
    }

    /// Writes an integer preference.
    ///
    /// # Errors
    ///
    /// See [`PreferenceStore::set`].
    fn set_int(&self, name: &str, value: i32) -> Result<()> {
        self.set(name, PreferenceValue::Int(value))
    }

    /// Returns the string value of `name`, if set and a string.
    fn get_string(&self, name: &str) -> Option<String> {
        self.get(name).and_then(|v| v.as_str().map(str::to_string))
    }

    /// Writes a string preference.
    ///
    /// # Errors
    ///
    /// See [`PreferenceStore::set`].
    fn set_string(&self, name: &str, value: &str) -> Result<()> {
        self.set(name, PreferenceValue::from(value))
    }
}

// ============================================================================
// MemoryPreferences
// ============================================================================

/// Thread-safe in-memory preference store.
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<FxHashMap<String, PreferenceValue>>,
}

impl MemoryPreferences {
    /// Creates an empty store.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with `entries`.
    #[must_use]
    pub fn with_values<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<PreferenceValue>,
    {
        let values = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            values: RwLock::new(values),
        }
    }

    /// Returns all values sorted by name.
    #[must_use]
    pub fn snapshot(&self) -> Vec<(String, PreferenceValue)> {
        let mut entries: Vec<_> = self
            .values
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Returns the number of set preferences.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    /// Returns `true` if no preference is set.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, name: &str) -> Option<PreferenceValue> {
        self.values.read().get(name).cloned()
    }

    fn set(&self, name: &str, value: PreferenceValue) -> Result<()> {
        self.values.write().insert(name.to_string(), value);
        Ok(())
    }

    fn clear(&self, name: &str) -> Result<()> {
        self.values.write().remove(name);
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let prefs = MemoryPreferences::new();
        assert!(prefs.is_empty());

        prefs.set_int("network.proxy.http_port", 8080).unwrap();
        prefs.set_string("network.proxy.http", "localhost").unwrap();

        assert_eq!(prefs.get_int("network.proxy.http_port"), Some(8080));
        assert_eq!(
            prefs.get_string("network.proxy.http").as_deref(),
            Some("localhost")
        );
        assert_eq!(prefs.len(), 2);
    }

    #[test]
    fn test_typed_getters_reject_other_kinds() {
        let prefs = MemoryPreferences::with_values([("a", PreferenceValue::Bool(true))]);
        assert_eq!(prefs.get_int("a"), None);
        assert_eq!(prefs.get_string("a"), None);
        assert_eq!(prefs.get("a"), Some(PreferenceValue::Bool(true)));
    }

    #[test]
    fn test_clear() {
        let prefs = MemoryPreferences::with_values([("network.proxy.type", 5)]);
        prefs.clear("network.proxy.type").unwrap();
        assert_eq!(prefs.get("network.proxy.type"), None);

        // Clearing an unset preference is fine.
        prefs.clear("network.proxy.type").unwrap();
    }

    #[test]
    fn test_snapshot_sorted() {
        let prefs = MemoryPreferences::with_values([("b", 2), ("a", 1)]);
        let names: Vec<_> = prefs.snapshot().into_iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["a", "b"]);
    }
}
