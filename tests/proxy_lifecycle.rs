//! Proxy preference application and restoration against an in-memory store.

use anyhow::Result;
use firefox_capabilities::capabilities::proxy::pref;
use firefox_capabilities::{
    Error, HostInfo, MemoryPreferences, Negotiator, PreferenceStore, PreferenceValue,
    ProxyConfiguration,
};
use serde_json::json;

// ============================================================================
// Helpers
// ============================================================================

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Store that fails every write to one preference.
struct LockedPreference {
    inner: MemoryPreferences,
    locked: &'static str,
}

impl PreferenceStore for LockedPreference {
    fn get(&self, name: &str) -> Option<PreferenceValue> {
        self.inner.get(name)
    }

    fn set(&self, name: &str, value: PreferenceValue) -> firefox_capabilities::Result<()> {
        if name == self.locked {
            return Err(Error::preference(name, "preference is locked"));
        }
        self.inner.set(name, value)
    }

    fn clear(&self, name: &str) -> firefox_capabilities::Result<()> {
        self.inner.clear(name)
    }
}

// ============================================================================
// Session Lifecycle
// ============================================================================

#[test]
fn test_session_proxy_applied_and_restored() -> Result<()> {
    init_tracing();

    let negotiator = Negotiator::builder()
        .host(HostInfo::new("Firefox", "128.0"))
        .build()?;
    let mut session = negotiator.new_session_capabilities(&json!({ "capabilities": {
        "alwaysMatch": {
            "proxy": {
                "proxyType": "manual",
                "httpProxy": "proxy.example:3128",
                "noProxy": ["localhost", "[::1]"],
            },
        },
    }}))?;

    let prefs = MemoryPreferences::with_values([(pref::TYPE, 5)]);
    let before = prefs.snapshot();

    let proxy = session
        .proxy_mut()
        .ok_or_else(|| anyhow::anyhow!("session has no proxy"))?;
    assert!(proxy.init(&prefs)?);

    assert_eq!(prefs.get_int(pref::TYPE), Some(1));
    assert_eq!(prefs.get_string(pref::HTTP).as_deref(), Some("proxy.example"));
    assert_eq!(prefs.get_int(pref::HTTP_PORT), Some(3128));
    assert_eq!(
        prefs.get_string(pref::NO_PROXIES_ON).as_deref(),
        Some("localhost, ::1")
    );

    proxy.destroy(&prefs)?;
    assert_eq!(prefs.snapshot(), before);
    Ok(())
}

#[test]
fn test_destroy_is_idempotent() -> Result<()> {
    let prefs = MemoryPreferences::new();
    let mut proxy = ProxyConfiguration::pac("http://pac.example/proxy.pac");

    proxy.init(&prefs)?;
    proxy.destroy(&prefs)?;
    proxy.destroy(&prefs)?;

    assert!(prefs.is_empty());
    assert!(!proxy.is_applied());
    Ok(())
}

#[test]
fn test_reinit_after_destroy() -> Result<()> {
    let prefs = MemoryPreferences::new();
    let mut proxy = ProxyConfiguration::pac("http://pac.example/proxy.pac");

    proxy.init(&prefs)?;
    assert!(matches!(proxy.init(&prefs), Err(Error::InvalidState { .. })));

    proxy.destroy(&prefs)?;
    assert!(proxy.init(&prefs)?);
    assert_eq!(prefs.get_int(pref::TYPE), Some(2));
    proxy.destroy(&prefs)?;
    Ok(())
}

#[test]
fn test_guard_restores_on_drop() -> Result<()> {
    init_tracing();

    let prefs = MemoryPreferences::with_values([(pref::HTTP, "original.example")]);
    let before = prefs.snapshot();

    {
        let config = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "httpProxy": "override.example:8080",
        }))?;
        let guard = config.apply(&prefs)?;
        assert!(guard.is_configured());
        assert_eq!(
            prefs.get_string(pref::HTTP).as_deref(),
            Some("override.example")
        );
    }

    assert_eq!(prefs.snapshot(), before);
    Ok(())
}

#[test]
fn test_guard_release_reports_result() -> Result<()> {
    let prefs = MemoryPreferences::new();
    let guard = ProxyConfiguration::from_json(&json!({ "proxyType": "direct" }))?.apply(&prefs)?;
    assert_eq!(prefs.get_int(pref::TYPE), Some(0));

    guard.release()?;
    assert!(prefs.is_empty());
    Ok(())
}

#[test]
fn test_empty_proxy_writes_nothing() -> Result<()> {
    let prefs = MemoryPreferences::new();
    let guard = ProxyConfiguration::new().apply(&prefs)?;

    assert!(!guard.is_configured());
    assert!(prefs.is_empty());
    Ok(())
}

#[test]
fn test_failed_write_rolls_back() -> Result<()> {
    init_tracing();

    let store = LockedPreference {
        inner: MemoryPreferences::with_values([(pref::TYPE, 4)]),
        locked: pref::SSL_PORT,
    };
    let before = store.inner.snapshot();

    let mut proxy = ProxyConfiguration::from_json(&json!({
        "proxyType": "manual",
        "httpProxy": "a.example:1",
        "sslProxy": "b.example:2",
    }))?;

    let err = proxy.init(&store).unwrap_err();
    assert!(matches!(err, Error::Preference { ref name, .. } if name == pref::SSL_PORT));
    assert!(!proxy.is_applied());
    assert_eq!(store.inner.snapshot(), before);
    Ok(())
}
