//! Proxy configuration.
//!
//! Parses the `proxy` capability and applies it to the browser's
//! `network.proxy.*` preferences. Every write records the value it
//! replaced, so [`ProxyConfiguration::destroy`] puts the preference store
//! back exactly as it was.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::prefs::{MemoryPreferences, PreferenceStore};
//! use firefox_capabilities::ProxyConfiguration;
//! use serde_json::json;
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let prefs = MemoryPreferences::new();
//! let mut proxy = ProxyConfiguration::from_json(&json!({
//!     "proxyType": "manual",
//!     "httpProxy": "localhost:8080",
//! }))?;
//!
//! assert!(proxy.init(&prefs)?);
//! assert_eq!(prefs.get_int("network.proxy.type"), Some(1));
//! assert_eq!(prefs.get_int("network.proxy.http_port"), Some(8080));
//!
//! proxy.destroy(&prefs)?;
//! assert!(prefs.is_empty());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::{debug, warn};
use url::Url;

use crate::assert;
use crate::error::{Error, Result};
use crate::format::{pprint, truncate};
use crate::prefs::{PreferenceKind, PreferenceStore, PreferenceValue};

use super::marshal::marshal;

// ============================================================================
// Preference Names
// ============================================================================

/// Names of the preferences written by [`ProxyConfiguration::init`].
pub mod pref {
    /// Proxy mode (see [`ProxyType::network_mode`](super::ProxyType::network_mode)).
    pub const TYPE: &str = "network.proxy.type";
    /// HTTP proxy host.
    pub const HTTP: &str = "network.proxy.http";
    /// HTTP proxy port.
    pub const HTTP_PORT: &str = "network.proxy.http_port";
    /// SSL proxy host.
    pub const SSL: &str = "network.proxy.ssl";
    /// SSL proxy port.
    pub const SSL_PORT: &str = "network.proxy.ssl_port";
    /// SOCKS proxy host.
    pub const SOCKS: &str = "network.proxy.socks";
    /// SOCKS proxy port.
    pub const SOCKS_PORT: &str = "network.proxy.socks_port";
    /// SOCKS protocol version.
    pub const SOCKS_VERSION: &str = "network.proxy.socks_version";
    /// Comma separated bypass list.
    pub const NO_PROXIES_ON: &str = "network.proxy.no_proxies_on";
    /// PAC script URL.
    pub const AUTOCONFIG_URL: &str = "network.proxy.autoconfig_url";
}

// ============================================================================
// ProxyType
// ============================================================================

/// Proxy strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProxyType {
    /// Auto-detect proxy settings (WPAD).
    Autodetect,

    /// Direct connection (no proxy).
    Direct,

    /// Explicit per-protocol proxies.
    Manual,

    /// Proxy auto-configuration script.
    Pac,

    /// Operating system proxy settings.
    System,
}

// ============================================================================
// ProxyType - Implementation
// ============================================================================

impl ProxyType {
    /// Every proxy type, in wire-name order.
    pub const ALL: [Self; 5] = [
        Self::Autodetect,
        Self::Direct,
        Self::Manual,
        Self::Pac,
        Self::System,
    ];

    /// Returns the wire name.
    #[inline]
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Autodetect => "autodetect",
            Self::Direct => "direct",
            Self::Manual => "manual",
            Self::Pac => "pac",
            Self::System => "system",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    /// Returns the `network.proxy.type` value for this strategy.
    #[inline]
    #[must_use]
    pub const fn network_mode(&self) -> i32 {
        match self {
            Self::Direct => 0,
            Self::Manual => 1,
            Self::Pac => 2,
            Self::Autodetect => 4,
            Self::System => 5,
        }
    }
}

// ============================================================================
// StashedPreference
// ============================================================================

/// A preference written by `init()` together with the value it replaced.
#[derive(Debug)]
struct StashedPreference {
    name: &'static str,
    kind: PreferenceKind,
    previous: Option<PreferenceValue>,
}

// ============================================================================
// ProxyConfiguration
// ============================================================================

/// Proxy configuration of a session.
///
/// Only the fields relevant to [`proxy_type`](Self::proxy_type) are
/// meaningful. Host names are stored without IPv6 brackets.
#[derive(Debug, Default)]
pub struct ProxyConfiguration {
    /// Strategy, `None` when no proxy behavior is configured.
    pub proxy_type: Option<ProxyType>,

    /// HTTP proxy host.
    pub http_proxy: Option<String>,

    /// HTTP proxy port.
    pub http_proxy_port: Option<u16>,

    /// Hosts that bypass the proxy.
    pub no_proxy: Option<Vec<String>>,

    /// SSL proxy host.
    pub ssl_proxy: Option<String>,

    /// SSL proxy port.
    pub ssl_proxy_port: Option<u16>,

    /// SOCKS proxy host.
    pub socks_proxy: Option<String>,

    /// SOCKS proxy port. SOCKS has no default port.
    pub socks_proxy_port: Option<u16>,

    /// SOCKS protocol version, bounded by the integer preference width.
    pub socks_version: Option<i32>,

    /// PAC script URL.
    pub proxy_autoconfig_url: Option<String>,

    /// Preferences written by the last `init()`, in write order.
    stash: Vec<StashedPreference>,

    /// Whether `init()` ran without a matching `destroy()`.
    applied: bool,
}

// ============================================================================
// ProxyConfiguration - Constructors
// ============================================================================

impl ProxyConfiguration {
    /// Creates an empty configuration (no proxy behavior).
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a configuration of the given type with no extra fields.
    #[inline]
    #[must_use]
    pub fn of_type(proxy_type: ProxyType) -> Self {
        Self {
            proxy_type: Some(proxy_type),
            ..Self::default()
        }
    }

    /// Creates a PAC configuration.
    #[inline]
    #[must_use]
    pub fn pac(url: impl Into<String>) -> Self {
        Self {
            proxy_type: Some(ProxyType::Pac),
            proxy_autoconfig_url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Creates a manual configuration with no proxies set.
    #[inline]
    #[must_use]
    pub fn manual() -> Self {
        Self::of_type(ProxyType::Manual)
    }
}

// ============================================================================
// ProxyConfiguration - Builder Methods
// ============================================================================

impl ProxyConfiguration {
    /// Sets the HTTP proxy.
    #[must_use]
    pub fn with_http_proxy(mut self, host: impl Into<String>, port: Option<u16>) -> Self {
        self.http_proxy = Some(host.into());
        self.http_proxy_port = port;
        self
    }

    /// Sets the SSL proxy.
    #[must_use]
    pub fn with_ssl_proxy(mut self, host: impl Into<String>, port: Option<u16>) -> Self {
        self.ssl_proxy = Some(host.into());
        self.ssl_proxy_port = port;
        self
    }

    /// Sets the SOCKS proxy and protocol version.
    #[must_use]
    pub fn with_socks_proxy(
        mut self,
        host: impl Into<String>,
        port: Option<u16>,
        version: i32,
    ) -> Self {
        self.socks_proxy = Some(host.into());
        self.socks_proxy_port = port;
        self.socks_version = Some(version);
        self
    }

    /// Sets the bypass list.
    #[must_use]
    pub fn with_no_proxy(mut self, hosts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.no_proxy = Some(hosts.into_iter().map(Into::into).collect());
        self
    }
}

// ============================================================================
// ProxyConfiguration - Predicates
// ============================================================================

impl ProxyConfiguration {
    /// Returns `true` if `init()` has run without a matching `destroy()`.
    #[inline]
    #[must_use]
    pub fn is_applied(&self) -> bool {
        self.applied
    }

    /// Returns `true` if no proxy behavior is configured.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.proxy_type.is_none()
    }
}

// ============================================================================
// ProxyConfiguration - Preference Application
// ============================================================================

impl ProxyConfiguration {
    /// Computes the preference writes for this configuration.
    ///
    /// Pure: nothing is written. Empty when no proxy type is set.
    #[must_use]
    pub fn preferences(&self) -> Vec<(&'static str, PreferenceValue)> {
        let Some(proxy_type) = self.proxy_type else {
            return Vec::new();
        };

        let mut writes = vec![(pref::TYPE, PreferenceValue::Int(proxy_type.network_mode()))];

        match proxy_type {
            ProxyType::Autodetect | ProxyType::Direct | ProxyType::System => {}

            ProxyType::Pac => {
                if let Some(url) = &self.proxy_autoconfig_url {
                    writes.push((pref::AUTOCONFIG_URL, PreferenceValue::from(url.as_str())));
                }
            }

            ProxyType::Manual => {
                push_host(&mut writes, pref::HTTP, pref::HTTP_PORT, &self.http_proxy, self.http_proxy_port);
                push_host(&mut writes, pref::SSL, pref::SSL_PORT, &self.ssl_proxy, self.ssl_proxy_port);

                if push_host(
                    &mut writes,
                    pref::SOCKS,
                    pref::SOCKS_PORT,
                    &self.socks_proxy,
                    self.socks_proxy_port,
                ) && let Some(version) = self.socks_version.filter(|v| *v != 0)
                {
                    writes.push((pref::SOCKS_VERSION, PreferenceValue::Int(version)));
                }

                if let Some(hosts) = &self.no_proxy {
                    writes.push((pref::NO_PROXIES_ON, PreferenceValue::String(hosts.join(", "))));
                }
            }
        }

        writes
    }

    /// Applies this configuration to the preference store.
    ///
    /// Returns `true` if preferences were written, `false` if no proxy
    /// type is set and nothing was done. If a write fails, every
    /// preference already written is restored before the error is
    /// returned.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidState`] if called again without `destroy()`
    /// - [`Error::Preference`] if the store rejects a write
    pub fn init<S>(&mut self, prefs: &S) -> Result<bool>
    where
        S: PreferenceStore + ?Sized,
    {
        if self.applied {
            return Err(Error::invalid_state(
                "proxy preferences already applied, destroy() must run first",
            ));
        }

        let Some(proxy_type) = self.proxy_type else {
            return Ok(false);
        };

        for (name, value) in self.preferences() {
            if let Err(err) = self.set_preference(prefs, name, value) {
                if let Err(restore_err) = self.restore(prefs) {
                    warn!(error = %restore_err, "Failed to roll back proxy preferences");
                }
                return Err(err);
            }
        }

        self.applied = true;
        debug!(
            proxy_type = proxy_type.as_str(),
            count = self.stash.len(),
            "Applied proxy preferences"
        );
        Ok(true)
    }

    /// Restores every preference written by `init()`.
    ///
    /// Previously unset preferences are cleared. A second call without an
    /// intervening `init()` does nothing.
    ///
    /// # Errors
    ///
    /// Returns the first [`Error::Preference`] raised by the store. All
    /// remaining preferences are still restored.
    pub fn destroy<S>(&mut self, prefs: &S) -> Result<()>
    where
        S: PreferenceStore + ?Sized,
    {
        let count = self.stash.len();
        let result = self.restore(prefs);
        self.applied = false;

        if count > 0 {
            debug!(count, "Restored proxy preferences");
        }
        result
    }

    /// Runs `init()` and returns a guard that runs `destroy()` on drop.
    ///
    /// # Errors
    ///
    /// Same as [`ProxyConfiguration::init`].
    pub fn apply<S>(mut self, prefs: &S) -> Result<AppliedProxy<'_, S>>
    where
        S: PreferenceStore + ?Sized,
    {
        let configured = self.init(prefs)?;
        Ok(AppliedProxy {
            config: self,
            prefs,
            configured,
        })
    }

    fn set_preference<S>(&mut self, prefs: &S, name: &'static str, value: PreferenceValue) -> Result<()>
    where
        S: PreferenceStore + ?Sized,
    {
        let previous = prefs.get(name);
        let kind = value.kind();

        debug!(
            name,
            kind = kind.as_str(),
            value = %value,
            previous = ?previous.as_ref().map(ToString::to_string),
            "Setting proxy preference"
        );

        prefs.set(name, value)?;
        self.stash.push(StashedPreference {
            name,
            kind,
            previous,
        });
        Ok(())
    }

    fn restore<S>(&mut self, prefs: &S) -> Result<()>
    where
        S: PreferenceStore + ?Sized,
    {
        let mut first_error = None;

        // Reverse order so a preference written twice ends at its oldest value.
        for entry in self.stash.drain(..).rev() {
            let result = match entry.previous {
                Some(value) => prefs.set(entry.name, value),
                None => prefs.clear(entry.name),
            };

            if let Err(err) = result {
                warn!(name = entry.name, kind = entry.kind.as_str(), error = %err, "Failed to restore preference");
                first_error.get_or_insert(err);
            }
        }

        first_error.map_or(Ok(()), Err)
    }
}

// ============================================================================
// ProxyConfiguration - Serialization
// ============================================================================

impl ProxyConfiguration {
    /// Parses the `proxy` capability.
    ///
    /// `null` yields an empty configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if the object is malformed, the
    /// proxy type is unknown, or a host is not of the form `host[:port]`.
    pub fn from_json(json: &Value) -> Result<Self> {
        let mut config = Self::new();
        if json.is_null() {
            return Ok(config);
        }

        let entries = assert::object(json, || {
            format!("Expected \"proxy\" to be an object, got {}", pprint(json))
        })?;

        let raw_type = entries.get("proxyType").ok_or_else(|| {
            Error::invalid_argument(format!(
                "Expected \"proxyType\" in \"proxy\" object, got {}",
                pprint(json)
            ))
        })?;
        let type_name = assert::string(raw_type, || {
            format!("Expected \"proxyType\" to be a string, got {}", pprint(raw_type))
        })?;
        let proxy_type = ProxyType::parse(type_name).ok_or_else(|| {
            Error::invalid_argument(format!("Invalid type of proxy: {}", truncate(type_name)))
        })?;
        config.proxy_type = Some(proxy_type);

        match proxy_type {
            ProxyType::Autodetect | ProxyType::Direct | ProxyType::System => {}

            ProxyType::Pac => {
                let url = entries.get("proxyAutoconfigUrl").unwrap_or(&Value::Null);
                let url = assert::string(url, || {
                    format!("Expected \"proxyAutoconfigUrl\" to be a string, got {}", pprint(url))
                })?;
                config.proxy_autoconfig_url = Some(url.to_string());
            }

            ProxyType::Manual => config.read_manual(entries)?,
        }

        Ok(config)
    }

    fn read_manual(&mut self, entries: &Map<String, Value>) -> Result<()> {
        if let Some(host) = entries.get("httpProxy") {
            let (host, port) = from_host_value("http", host)?;
            self.http_proxy = Some(host);
            self.http_proxy_port = port;
        }

        if let Some(host) = entries.get("sslProxy") {
            let (host, port) = from_host_value("https", host)?;
            self.ssl_proxy = Some(host);
            self.ssl_proxy_port = port;
        }

        let socks_version = entries.get("socksVersion");
        if let Some(host) = entries.get("socksProxy") {
            let (host, port) = from_host_value("socks", host)?;
            self.socks_proxy = Some(host);
            self.socks_proxy_port = port;

            let version = socks_version.unwrap_or(&Value::Null);
            let message = || {
                format!(
                    "Expected \"socksVersion\" to be a positive integer, got {}",
                    pprint(version)
                )
            };
            let parsed = assert::positive_integer(version, message)?;
            self.socks_version =
                Some(i32::try_from(parsed).map_err(|_| Error::invalid_argument(message()))?);
        } else if socks_version.is_some() {
            return Err(Error::invalid_argument(
                "Expected \"socksProxy\" to be provided if \"socksVersion\" is provided",
            ));
        }

        if let Some(raw) = entries.get("noProxy") {
            let items = assert::array(raw, || {
                format!("Expected \"noProxy\" to be an array, got {}", pprint(raw))
            })?;
            let hosts = items
                .iter()
                .map(|entry| {
                    assert::string(entry, || {
                        format!("Expected \"noProxy\" entry to be a string, got {}", pprint(entry))
                    })
                    .map(strip_ipv6_brackets)
                })
                .collect::<Result<Vec<_>>>()?;
            self.no_proxy = Some(hosts);
        }

        Ok(())
    }

    /// Marshals the fields relevant to the proxy type.
    ///
    /// Hosts are written as `host[:port]` with IPv6 brackets restored.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let no_proxy = self.no_proxy.as_ref().map(|hosts| {
            Value::Array(
                hosts
                    .iter()
                    .map(|h| Value::String(add_ipv6_brackets(h)))
                    .collect(),
            )
        });

        Value::Object(marshal([
            ("proxyType", opt(self.proxy_type.map(|t| t.as_str().to_string()))),
            ("httpProxy", opt(to_host(self.http_proxy.as_deref(), self.http_proxy_port))),
            ("noProxy", no_proxy.unwrap_or(Value::Null)),
            ("sslProxy", opt(to_host(self.ssl_proxy.as_deref(), self.ssl_proxy_port))),
            ("socksProxy", opt(to_host(self.socks_proxy.as_deref(), self.socks_proxy_port))),
            ("socksVersion", self.socks_version.map_or(Value::Null, Value::from)),
            ("proxyAutoconfigUrl", opt(self.proxy_autoconfig_url.clone())),
        ]))
    }
}

// ============================================================================
// ProxyConfiguration - Trait Implementations
// ============================================================================

/// Compares configuration fields only; applied state is ignored.
impl PartialEq for ProxyConfiguration {
    fn eq(&self, other: &Self) -> bool {
        self.proxy_type == other.proxy_type
            && self.http_proxy == other.http_proxy
            && self.http_proxy_port == other.http_proxy_port
            && self.no_proxy == other.no_proxy
            && self.ssl_proxy == other.ssl_proxy
            && self.ssl_proxy_port == other.ssl_proxy_port
            && self.socks_proxy == other.socks_proxy
            && self.socks_proxy_port == other.socks_proxy_port
            && self.socks_version == other.socks_version
            && self.proxy_autoconfig_url == other.proxy_autoconfig_url
    }
}

impl Eq for ProxyConfiguration {}

/// Clones the configuration fields. The clone starts unapplied.
impl Clone for ProxyConfiguration {
    fn clone(&self) -> Self {
        Self {
            proxy_type: self.proxy_type,
            http_proxy: self.http_proxy.clone(),
            http_proxy_port: self.http_proxy_port,
            no_proxy: self.no_proxy.clone(),
            ssl_proxy: self.ssl_proxy.clone(),
            ssl_proxy_port: self.ssl_proxy_port,
            socks_proxy: self.socks_proxy.clone(),
            socks_proxy_port: self.socks_proxy_port,
            socks_version: self.socks_version,
            proxy_autoconfig_url: self.proxy_autoconfig_url.clone(),
            stash: Vec::new(),
            applied: false,
        }
    }
}

impl Serialize for ProxyConfiguration {
    fn serialize<Ser: Serializer>(&self, serializer: Ser) -> std::result::Result<Ser::Ok, Ser::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// AppliedProxy
// ============================================================================

/// Proxy preferences held for the lifetime of a session.
///
/// Dropping the guard restores the preferences. Use
/// [`release`](Self::release) to observe restore errors.
#[derive(Debug)]
pub struct AppliedProxy<'a, S>
where
    S: PreferenceStore + ?Sized,
{
    config: ProxyConfiguration,
    prefs: &'a S,
    configured: bool,
}

impl<S> AppliedProxy<'_, S>
where
    S: PreferenceStore + ?Sized,
{
    /// Returns `true` if `init()` wrote any preference.
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Returns the applied configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ProxyConfiguration {
        &self.config
    }

    /// Restores the preferences now.
    ///
    /// # Errors
    ///
    /// Same as [`ProxyConfiguration::destroy`].
    pub fn release(mut self) -> Result<()> {
        self.config.destroy(self.prefs)
    }
}

impl<S> Drop for AppliedProxy<'_, S>
where
    S: PreferenceStore + ?Sized,
{
    fn drop(&mut self) {
        if let Err(err) = self.config.destroy(self.prefs) {
            warn!(error = %err, "Failed to restore proxy preferences on drop");
        }
    }
}

// ============================================================================
// Host Parsing
// ============================================================================

/// Parses `host[:port]` for a proxy of the given scheme.
///
/// Without an explicit port the scheme's default port is used, except for
/// `socks` which has none. IPv6 brackets are stripped from the host.
///
/// # Errors
///
/// Returns [`Error::InvalidArgument`] if `host` carries a scheme,
/// credentials, a path, a query or a fragment.
///
/// # Example
///
/// ```
/// use firefox_capabilities::capabilities::from_host;
///
/// # fn example() -> firefox_capabilities::Result<()> {
/// assert_eq!(from_host("http", "example.com")?, ("example.com".to_string(), Some(80)));
/// assert_eq!(from_host("socks", "[::1]:1080")?, ("::1".to_string(), Some(1080)));
/// assert_eq!(from_host("socks", "example.com")?.1, None);
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn from_host(scheme: &str, host: &str) -> Result<(String, Option<u16>)> {
    if host.contains("://") {
        return Err(Error::invalid_argument(format!(
            "{} contains a scheme",
            truncate(host)
        )));
    }

    // Parsing needs a scheme. An empty port means either none or the
    // scheme's default, so retry with another scheme to tell them apart.
    let url = parse_with_scheme("http", host)?;
    let url = if url.port().is_some() {
        url
    } else {
        parse_with_scheme("https", host)?
    };

    let malformed = !url.username().is_empty()
        || url.password().is_some_and(|p| !p.is_empty())
        || url.path() != "/"
        || url.query().is_some_and(|q| !q.is_empty())
        || url.fragment().is_some_and(|f| !f.is_empty());

    let hostname = match url.host_str() {
        Some(hostname) if !malformed => strip_ipv6_brackets(hostname),
        _ => {
            return Err(Error::invalid_argument(format!(
                "{} was not of the form host[:port]",
                truncate(host)
            )));
        }
    };

    let port = match url.port() {
        Some(port) => Some(port),
        None if scheme == "socks" => None,
        None => default_port(scheme),
    };

    Ok((hostname, port))
}

// ============================================================================
// Private Helpers
// ============================================================================

fn from_host_value(scheme: &str, host: &Value) -> Result<(String, Option<u16>)> {
    let host = assert::string(host, || {
        format!("Expected proxy \"host\" to be a string, got {}", pprint(host))
    })?;
    from_host(scheme, host)
}

fn parse_with_scheme(scheme: &str, host: &str) -> Result<Url> {
    let candidate = format!("{scheme}://{host}");
    Url::parse(&candidate).map_err(|_| {
        Error::invalid_argument(format!(
            "Expected \"url\" to be a valid URL, got {}",
            truncate(&candidate)
        ))
    })
}

fn default_port(scheme: &str) -> Option<u16> {
    Url::parse(&format!("{scheme}://localhost"))
        .ok()
        .and_then(|url| url.port_or_known_default())
}

fn strip_ipv6_brackets(hostname: &str) -> String {
    if hostname.contains(':') {
        hostname.replace(['[', ']'], "")
    } else {
        hostname.to_string()
    }
}

fn add_ipv6_brackets(hostname: &str) -> String {
    if hostname.contains(':') {
        format!("[{hostname}]")
    } else {
        hostname.to_string()
    }
}

fn to_host(hostname: Option<&str>, port: Option<u16>) -> Option<String> {
    let hostname = hostname.filter(|h| !h.is_empty())?;
    let hostname = add_ipv6_brackets(hostname);

    Some(match port {
        Some(port) => format!("{hostname}:{port}"),
        None => hostname,
    })
}

/// Pushes host and port writes when `host` is non-empty.
fn push_host(
    writes: &mut Vec<(&'static str, PreferenceValue)>,
    host_pref: &'static str,
    port_pref: &'static str,
    host: &Option<String>,
    port: Option<u16>,
) -> bool {
    let Some(host) = host.as_deref().filter(|h| !h.is_empty()) else {
        return false;
    };

    writes.push((host_pref, PreferenceValue::from(host)));
    if let Some(port) = port {
        writes.push((port_pref, PreferenceValue::Int(i32::from(port))));
    }
    true
}

fn opt(value: Option<String>) -> Value {
    value.map_or(Value::Null, Value::String)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    use crate::prefs::MemoryPreferences;

    // ------------------------------------------------------------------------
    // ProxyType Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_proxy_type_as_str() {
        assert_eq!(ProxyType::Autodetect.as_str(), "autodetect");
        assert_eq!(ProxyType::Direct.as_str(), "direct");
        assert_eq!(ProxyType::Manual.as_str(), "manual");
        assert_eq!(ProxyType::Pac.as_str(), "pac");
        assert_eq!(ProxyType::System.as_str(), "system");
    }

    #[test]
    fn test_proxy_type_serialization() {
        for t in ProxyType::ALL {
            let json = serde_json::to_value(t).unwrap();
            assert_eq!(json, json!(t.as_str()));
            assert_eq!(ProxyType::parse(t.as_str()), Some(t));
        }
        assert_eq!(ProxyType::parse("socks"), None);
    }

    #[test]
    fn test_proxy_type_network_mode() {
        assert_eq!(ProxyType::Direct.network_mode(), 0);
        assert_eq!(ProxyType::Manual.network_mode(), 1);
        assert_eq!(ProxyType::Pac.network_mode(), 2);
        assert_eq!(ProxyType::Autodetect.network_mode(), 4);
        assert_eq!(ProxyType::System.network_mode(), 5);
    }

    // ------------------------------------------------------------------------
    // Host Parsing Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_from_host_default_ports() {
        assert_eq!(
            from_host("http", "example.com").unwrap(),
            ("example.com".to_string(), Some(80))
        );
        assert_eq!(
            from_host("https", "example.com").unwrap(),
            ("example.com".to_string(), Some(443))
        );
        assert_eq!(
            from_host("socks", "example.com").unwrap(),
            ("example.com".to_string(), None)
        );
    }

    #[test]
    fn test_from_host_explicit_default_port() {
        // Port 80 is the http default, so the https pass must detect it.
        assert_eq!(from_host("socks", "example.com:80").unwrap().1, Some(80));
        assert_eq!(from_host("socks", "example.com:443").unwrap().1, Some(443));
        assert_eq!(from_host("https", "example.com:80").unwrap().1, Some(80));
    }

    #[test]
    fn test_from_host_ipv6() {
        assert_eq!(
            from_host("http", "[::1]:8080").unwrap(),
            ("::1".to_string(), Some(8080))
        );
        assert_eq!(from_host("socks", "[::1]").unwrap(), ("::1".to_string(), None));
    }

    #[test]
    fn test_from_host_rejects_scheme() {
        let err = from_host("http", "http://example.com").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: http://example.com contains a scheme"
        );
    }

    #[test]
    fn test_from_host_rejects_extra_parts() {
        for host in [
            "user:pass@example.com",
            "user@example.com",
            "example.com/path",
            "example.com?query=1",
            "example.com#fragment",
        ] {
            let err = from_host("http", host).unwrap_err();
            assert!(
                err.to_string().contains("was not of the form host[:port]"),
                "{host}: {err}"
            );
        }
    }

    #[test]
    fn test_from_host_accepts_trailing_slash() {
        assert_eq!(from_host("http", "example.com/").unwrap().0, "example.com");
    }

    #[test]
    fn test_from_host_invalid_url() {
        let err = from_host("http", "example.com:99999").unwrap_err();
        assert!(err.to_string().contains("to be a valid URL"));
    }

    // ------------------------------------------------------------------------
    // from_json Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_from_json_null_is_empty() {
        let config = ProxyConfiguration::from_json(&Value::Null).unwrap();
        assert!(config.is_empty());
        assert_eq!(config.to_json(), json!({}));
    }

    #[test]
    fn test_from_json_simple_types() {
        for name in ["autodetect", "direct", "system"] {
            let config =
                ProxyConfiguration::from_json(&json!({ "proxyType": name, "httpProxy": 1 }))
                    .unwrap();
            assert_eq!(config.proxy_type.map(|t| t.as_str()), Some(name));
            assert!(config.http_proxy.is_none());
        }
    }

    #[test]
    fn test_from_json_requires_object_and_type() {
        assert!(ProxyConfiguration::from_json(&json!("manual")).is_err());

        let err = ProxyConfiguration::from_json(&json!({})).unwrap_err();
        assert!(err.to_string().contains("Expected \"proxyType\" in \"proxy\" object"));

        let err = ProxyConfiguration::from_json(&json!({ "proxyType": 1 })).unwrap_err();
        assert!(err.to_string().contains("to be a string"));

        let err = ProxyConfiguration::from_json(&json!({ "proxyType": "ftp" })).unwrap_err();
        assert_eq!(err.to_string(), "Invalid argument: Invalid type of proxy: ftp");
    }

    #[test]
    fn test_from_json_pac() {
        let config = ProxyConfiguration::from_json(&json!({
            "proxyType": "pac",
            "proxyAutoconfigUrl": "http://localhost/proxy.pac",
        }))
        .unwrap();
        assert_eq!(config, ProxyConfiguration::pac("http://localhost/proxy.pac"));

        assert!(ProxyConfiguration::from_json(&json!({ "proxyType": "pac" })).is_err());
    }

    #[test]
    fn test_from_json_manual() {
        let config = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "httpProxy": "localhost:8080",
            "sslProxy": "secure.example.com",
            "socksProxy": "[2001:db8::1]:1080",
            "socksVersion": 5,
            "noProxy": ["localhost", "[::1]"],
        }))
        .unwrap();

        let expected = ProxyConfiguration::manual()
            .with_http_proxy("localhost", Some(8080))
            .with_ssl_proxy("secure.example.com", Some(443))
            .with_socks_proxy("2001:db8::1", Some(1080), 5)
            .with_no_proxy(["localhost", "::1"]);
        assert_eq!(config, expected);
    }

    #[test]
    fn test_from_json_socks_version_rules() {
        let err = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "socksVersion": 5,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("\"socksProxy\" to be provided"));

        let err = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "socksProxy": "localhost:1080",
        }))
        .unwrap_err();
        assert!(err.to_string().contains("\"socksVersion\" to be a positive integer"));

        assert!(ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "socksProxy": "localhost:1080",
            "socksVersion": 2_147_483_648u64,
        }))
        .is_err());
    }

    #[test]
    fn test_socks_version_beyond_byte_range() {
        let config = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "socksProxy": "localhost:1080",
            "socksVersion": 256,
        }))
        .unwrap();
        assert_eq!(config.socks_version, Some(256));
        assert!(
            config
                .preferences()
                .contains(&(pref::SOCKS_VERSION, PreferenceValue::Int(256)))
        );
        assert_eq!(config.to_json()["socksVersion"], json!(256));
    }

    #[test]
    fn test_from_json_no_proxy_entries_must_be_strings() {
        assert!(ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "noProxy": "localhost",
        }))
        .is_err());
        assert!(ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "noProxy": ["localhost", 1],
        }))
        .is_err());
    }

    #[test]
    fn test_from_json_null_host_rejected() {
        let err = ProxyConfiguration::from_json(&json!({
            "proxyType": "manual",
            "httpProxy": null,
        }))
        .unwrap_err();
        assert!(err.to_string().contains("Expected proxy \"host\" to be a string"));
    }

    // ------------------------------------------------------------------------
    // to_json Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_to_json_manual() {
        let config = ProxyConfiguration::manual()
            .with_http_proxy("localhost", Some(8080))
            .with_socks_proxy("::1", None, 4)
            .with_no_proxy(["example.org", "fe80::1"]);

        assert_eq!(
            config.to_json(),
            json!({
                "proxyType": "manual",
                "httpProxy": "localhost:8080",
                "noProxy": ["example.org", "[fe80::1]"],
                "socksProxy": "[::1]",
                "socksVersion": 4,
            })
        );
    }

    #[test]
    fn test_to_json_round_trip() {
        let config = ProxyConfiguration::manual()
            .with_http_proxy("example.com", Some(80))
            .with_ssl_proxy("example.com", Some(8443))
            .with_socks_proxy("10.0.0.1", None, 5);
        assert_eq!(ProxyConfiguration::from_json(&config.to_json()).unwrap(), config);
    }

    // ------------------------------------------------------------------------
    // init / destroy Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_init_without_type_is_noop() {
        let prefs = MemoryPreferences::new();
        let mut config = ProxyConfiguration::new();
        assert!(!config.init(&prefs).unwrap());
        assert!(prefs.is_empty());
        assert!(!config.is_applied());
    }

    #[test]
    fn test_init_simple_modes() {
        for (t, mode) in [
            (ProxyType::Autodetect, 4),
            (ProxyType::Direct, 0),
            (ProxyType::System, 5),
        ] {
            let prefs = MemoryPreferences::new();
            let mut config = ProxyConfiguration::of_type(t);
            assert!(config.init(&prefs).unwrap());
            assert_eq!(prefs.snapshot(), vec![(pref::TYPE.to_string(), PreferenceValue::Int(mode))]);
        }
    }

    #[test]
    fn test_init_pac() {
        let prefs = MemoryPreferences::new();
        let mut config = ProxyConfiguration::pac("http://localhost/proxy.pac");
        config.init(&prefs).unwrap();
        assert_eq!(prefs.get_int(pref::TYPE), Some(2));
        assert_eq!(
            prefs.get_string(pref::AUTOCONFIG_URL).as_deref(),
            Some("http://localhost/proxy.pac")
        );
    }

    #[test]
    fn test_init_manual_writes_only_set_fields() {
        let prefs = MemoryPreferences::new();
        let mut config = ProxyConfiguration::manual()
            .with_socks_proxy("socks.local", None, 5)
            .with_no_proxy(["localhost", "127.0.0.1"]);
        config.init(&prefs).unwrap();

        assert_eq!(prefs.get_int(pref::TYPE), Some(1));
        assert_eq!(prefs.get_string(pref::SOCKS).as_deref(), Some("socks.local"));
        assert_eq!(prefs.get(pref::SOCKS_PORT), None);
        assert_eq!(prefs.get_int(pref::SOCKS_VERSION), Some(5));
        assert_eq!(
            prefs.get_string(pref::NO_PROXIES_ON).as_deref(),
            Some("localhost, 127.0.0.1")
        );
        assert_eq!(prefs.get(pref::HTTP), None);
        assert_eq!(prefs.get(pref::SSL), None);
    }

    #[test]
    fn test_destroy_restores_previous_values() {
        let prefs = MemoryPreferences::with_values([
            (pref::TYPE, PreferenceValue::Int(5)),
            (pref::HTTP, PreferenceValue::from("old.example.com")),
        ]);
        let before = prefs.snapshot();

        let mut config = ProxyConfiguration::manual().with_http_proxy("localhost", Some(8080));
        config.init(&prefs).unwrap();
        assert_eq!(prefs.get_string(pref::HTTP).as_deref(), Some("localhost"));

        config.destroy(&prefs).unwrap();
        assert_eq!(prefs.snapshot(), before);
        assert!(!config.is_applied());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let prefs = MemoryPreferences::with_values([(pref::TYPE, 0)]);
        let mut config = ProxyConfiguration::of_type(ProxyType::System);
        config.init(&prefs).unwrap();

        config.destroy(&prefs).unwrap();
        let once = prefs.snapshot();
        config.destroy(&prefs).unwrap();
        assert_eq!(prefs.snapshot(), once);
    }

    #[test]
    fn test_init_twice_is_rejected() {
        let prefs = MemoryPreferences::new();
        let mut config = ProxyConfiguration::of_type(ProxyType::Direct);
        config.init(&prefs).unwrap();

        let err = config.init(&prefs).unwrap_err();
        assert!(matches!(err, Error::InvalidState { .. }));

        config.destroy(&prefs).unwrap();
        assert!(config.init(&prefs).unwrap());
    }

    #[test]
    fn test_clone_starts_unapplied() {
        let prefs = MemoryPreferences::new();
        let mut config = ProxyConfiguration::of_type(ProxyType::Direct);
        config.init(&prefs).unwrap();

        let clone = config.clone();
        assert!(!clone.is_applied());
        assert_eq!(clone, config);
    }

    // ------------------------------------------------------------------------
    // Failure Tests
    // ------------------------------------------------------------------------

    /// Store that rejects writes to one preference.
    struct RejectingStore {
        inner: MemoryPreferences,
        reject: &'static str,
    }

    impl PreferenceStore for RejectingStore {
        fn get(&self, name: &str) -> Option<PreferenceValue> {
            self.inner.get(name)
        }

        fn set(&self, name: &str, value: PreferenceValue) -> Result<()> {
            if name == self.reject {
                return Err(Error::preference(name, "locked"));
            }
            self.inner.set(name, value)
        }

        fn clear(&self, name: &str) -> Result<()> {
            self.inner.clear(name)
        }
    }

    #[test]
    fn test_init_rolls_back_on_failure() {
        let store = RejectingStore {
            inner: MemoryPreferences::with_values([(pref::TYPE, 5)]),
            reject: pref::HTTP_PORT,
        };
        let before = store.inner.snapshot();

        let mut config = ProxyConfiguration::manual().with_http_proxy("localhost", Some(8080));
        let err = config.init(&store).unwrap_err();

        assert!(matches!(err, Error::Preference { .. }));
        assert_eq!(store.inner.snapshot(), before);
        assert!(!config.is_applied());
    }

    // ------------------------------------------------------------------------
    // AppliedProxy Tests
    // ------------------------------------------------------------------------

    #[test]
    fn test_apply_guard_restores_on_drop() {
        let prefs = MemoryPreferences::new();
        {
            let guard = ProxyConfiguration::of_type(ProxyType::Autodetect)
                .apply(&prefs)
                .unwrap();
            assert!(guard.is_configured());
            assert_eq!(prefs.get_int(pref::TYPE), Some(4));
        }
        assert!(prefs.is_empty());
    }

    #[test]
    fn test_apply_guard_release() {
        let prefs = MemoryPreferences::with_values([(pref::TYPE, 0)]);
        let guard = ProxyConfiguration::of_type(ProxyType::System)
            .apply(&prefs)
            .unwrap();
        assert_eq!(guard.config().proxy_type, Some(ProxyType::System));

        guard.release().unwrap();
        assert_eq!(prefs.get_int(pref::TYPE), Some(0));
    }
}
