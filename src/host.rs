//! Host platform information.
//!
//! Read-only facts about the running browser that seed the informational
//! capabilities (`browserName`, `platformName`, `moz:buildID`, ...) and
//! drive the platform-dependent validation rules.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::HostInfo;
//!
//! let host = HostInfo::new("Firefox", "128.0")
//!     .with_os("Darwin", "23.4.0")
//!     .with_headless(true);
//!
//! assert_eq!(host.browser_name(), "firefox");
//! assert_eq!(host.platform_name(), "mac");
//! assert!(host.is_mac());
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::path::PathBuf;

// ============================================================================
// Constants
// ============================================================================

/// Reported in place of the profile path when it cannot be determined.
const PROTECTED_PROFILE: &str = "<protected>";

// ============================================================================
// HostInfo
// ============================================================================

/// Platform info provider consumed at capability map construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostInfo {
    /// Application name (e.g. "Firefox").
    pub app_name: String,

    /// Application version.
    pub app_version: String,

    /// Application build identifier.
    pub build_id: String,

    /// Browser process id.
    pub process_id: u32,

    /// Operating system name as reported by the system (e.g. "Linux",
    /// "Darwin", "Windows_NT").
    pub os_name: String,

    /// Operating system version.
    pub os_version: String,

    /// Running as GeckoView on Android.
    pub android: bool,

    /// Running without a GUI.
    pub headless: bool,

    /// Default user agent string.
    pub user_agent: String,

    /// Profile directory, when readable.
    pub profile: Option<PathBuf>,

    /// Async shutdown crash timeout in milliseconds, when configured.
    pub shutdown_timeout: Option<u64>,
}

// ============================================================================
// Constructors
// ============================================================================

impl HostInfo {
    /// Creates host info for the given application.
    ///
    /// OS name and process id are taken from the running process; every
    /// other field starts empty and can be filled with the `with_*` methods.
    ///
    /// # Arguments
    ///
    /// * `app_name` - Application name
    /// * `app_version` - Application version
    #[must_use]
    pub fn new(app_name: impl Into<String>, app_version: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            app_version: app_version.into(),
            build_id: String::new(),
            process_id: std::process::id(),
            os_name: current_os_name().to_string(),
            os_version: String::new(),
            android: cfg!(target_os = "android"),
            headless: false,
            user_agent: String::new(),
            profile: None,
            shutdown_timeout: None,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl HostInfo {
    /// Sets the application build id.
    #[inline]
    #[must_use]
    pub fn with_build_id(mut self, build_id: impl Into<String>) -> Self {
        self.build_id = build_id.into();
        self
    }

    /// Sets the browser process id.
    #[inline]
    #[must_use]
    pub fn with_process_id(mut self, pid: u32) -> Self {
        self.process_id = pid;
        self
    }

    /// Sets operating system name and version.
    #[inline]
    #[must_use]
    pub fn with_os(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.os_name = name.into();
        self.os_version = version.into();
        self
    }

    /// Marks the host as Android (GeckoView).
    #[inline]
    #[must_use]
    pub fn with_android(mut self, android: bool) -> Self {
        self.android = android;
        self
    }

    /// Sets headless mode.
    #[inline]
    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Sets the user agent string.
    #[inline]
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the profile directory.
    #[inline]
    #[must_use]
    pub fn with_profile(mut self, path: impl Into<PathBuf>) -> Self {
        self.profile = Some(path.into());
        self
    }

    /// Sets the async shutdown crash timeout.
    #[inline]
    #[must_use]
    pub fn with_shutdown_timeout(mut self, ms: u64) -> Self {
        self.shutdown_timeout = Some(ms);
        self
    }
}

// ============================================================================
// Derived Values
// ============================================================================

impl HostInfo {
    /// Returns `true` if the host runs macOS.
    #[inline]
    #[must_use]
    pub fn is_mac(&self) -> bool {
        !self.android && self.os_name == "Darwin"
    }

    /// Returns `true` if the host runs Android.
    #[inline]
    #[must_use]
    pub const fn is_android(&self) -> bool {
        self.android
    }

    /// WebDriver browser name.
    ///
    /// All GeckoView apps report "firefox", like chromedriver reports
    /// "chrome" for every WebView app.
    #[must_use]
    pub fn browser_name(&self) -> String {
        if self.android {
            return "firefox".to_string();
        }
        self.app_name.to_lowercase()
    }

    /// WebDriver platform name.
    #[must_use]
    pub fn platform_name(&self) -> String {
        if self.android {
            return "android".to_string();
        }

        match self.os_name.as_str() {
            "Windows_NT" => "windows".to_string(),
            "Darwin" => "mac".to_string(),
            other => other.to_lowercase(),
        }
    }

    /// Profile path for display, or `"<protected>"` when unknown.
    #[must_use]
    pub fn profile_display(&self) -> String {
        self.profile
            .as_ref()
            .map_or_else(|| PROTECTED_PROFILE.to_string(), |p| p.display().to_string())
    }
}

// ============================================================================
// Private Helpers
// ============================================================================

/// Maps the compile target OS to the name the system reports at runtime.
fn current_os_name() -> &'static str {
    match std::env::consts::OS {
        "linux" | "android" => "Linux",
        "macos" => "Darwin",
        "windows" => "Windows_NT",
        "freebsd" => "FreeBSD",
        "openbsd" => "OpenBSD",
        other => other,
    }
}

// ============================================================================
// Tests
// ============================================================================
