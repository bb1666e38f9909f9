//! Unhandled prompt behavior.
//!
//! The `unhandledPromptBehavior` capability is either a single handler
//! string applied to every prompt, or an object mapping prompt types to
//! handlers.
//!
//! # Example
//!
//! ```
//! use firefox_capabilities::capabilities::{PromptHandler, PromptType, UserPromptHandler};
//! use serde_json::json;
//!
//! # fn example() -> firefox_capabilities::Result<()> {
//! let behavior = UserPromptHandler::from_json(&json!({ "alert": "accept", "default": "ignore" }))?;
//!
//! assert_eq!(behavior.handler_for(PromptType::Alert).handler, PromptHandler::Accept);
//! assert_eq!(behavior.handler_for(PromptType::Confirm).handler, PromptHandler::Ignore);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

// ============================================================================
// Imports
// ============================================================================

use rustc_hash::FxHashMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::format::{pprint, truncate};

// ============================================================================
// PromptType
// ============================================================================

/// Kind of user prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptType {
    /// `window.alert()`.
    Alert,
    /// "Leave page?" dialog.
    BeforeUnload,
    /// `window.confirm()`.
    Confirm,
    /// Any prompt type without its own entry.
    Default,
    /// File picker.
    File,
    /// `window.prompt()`.
    Prompt,
}

impl PromptType {
    /// Every prompt type, in wire-name order.
    pub const ALL: [Self; 6] = [
        Self::Alert,
        Self::BeforeUnload,
        Self::Confirm,
        Self::Default,
        Self::File,
        Self::Prompt,
    ];

    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Alert => "alert",
            Self::BeforeUnload => "beforeUnload",
            Self::Confirm => "confirm",
            Self::Default => "default",
            Self::File => "file",
            Self::Prompt => "prompt",
        }
    }

    /// Parses a wire name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }
}

// ============================================================================
// PromptHandler
// ============================================================================

/// Action taken on a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptHandler {
    /// Accept the prompt.
    Accept,
    /// Dismiss the prompt.
    Dismiss,
    /// Leave the prompt open.
    Ignore,
}

impl PromptHandler {
    /// Returns the wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Dismiss => "dismiss",
            Self::Ignore => "ignore",
        }
    }
}

/// A handler plus whether the client is told about the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PromptHandlerConfiguration {
    /// Action taken.
    pub handler: PromptHandler,
    /// Report the prompt to the client with an error.
    pub notify: bool,
}

impl PromptHandlerConfiguration {
    /// Dismiss and notify, used when nothing else applies.
    pub const DEFAULT: Self = Self {
        handler: PromptHandler::Dismiss,
        notify: true,
    };

    /// Returns the wire name, including the `and notify` suffix.
    #[must_use]
    pub fn as_string(&self) -> String {
        if self.notify {
            format!("{} and notify", self.handler.as_str())
        } else {
            self.handler.as_str().to_string()
        }
    }

    /// Parses a handler string. Notify variants are only accepted in
    /// the single-string form of the capability.
    fn parse(s: &str, allow_notify: bool) -> Option<Self> {
        let (handler, notify) = match s {
            "accept" => (PromptHandler::Accept, false),
            "dismiss" => (PromptHandler::Dismiss, false),
            "ignore" => (PromptHandler::Ignore, false),
            "accept and notify" if allow_notify => (PromptHandler::Accept, true),
            "dismiss and notify" if allow_notify => (PromptHandler::Dismiss, true),
            _ => return None,
        };
        Some(Self { handler, notify })
    }
}

// ============================================================================
// UserPromptHandler
// ============================================================================

/// Configured unhandled prompt behavior of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPromptHandler {
    /// Handler from the single-string form.
    fallback_default: Option<PromptHandlerConfiguration>,

    /// Handlers from the object form.
    handlers: FxHashMap<PromptType, PromptHandlerConfiguration>,
}

impl UserPromptHandler {
    /// Creates a handler with nothing configured.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if no behavior was configured.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fallback_default.is_none() && self.handlers.is_empty()
    }

    /// Resolves the handler for a prompt type.
    #[must_use]
    pub fn handler_for(&self, prompt_type: PromptType) -> PromptHandlerConfiguration {
        if let Some(config) = self
            .handlers
            .get(&prompt_type)
            .or_else(|| self.handlers.get(&PromptType::Default))
        {
            return *config;
        }

        if prompt_type == PromptType::BeforeUnload {
            return PromptHandlerConfiguration {
                handler: PromptHandler::Accept,
                notify: false,
            };
        }

        self.fallback_default
            .unwrap_or(PromptHandlerConfiguration::DEFAULT)
    }

    /// Parses the `unhandledPromptBehavior` capability.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for unknown prompt types or
    /// handler names, or a value that is neither a string nor an object.
    pub fn from_json(json: &Value) -> Result<Self> {
        match json {
            Value::String(s) => {
                let config = PromptHandlerConfiguration::parse(s, true).ok_or_else(|| {
                    Error::invalid_argument(format!(
                        "Expected \"unhandledPromptBehavior\" to be a valid handler, got {}",
                        pprint(json)
                    ))
                })?;
                Ok(Self {
                    fallback_default: Some(config),
                    handlers: FxHashMap::default(),
                })
            }

            Value::Object(entries) => {
                let mut handlers = FxHashMap::default();
                for (name, value) in entries {
                    let prompt_type = PromptType::parse(name).ok_or_else(|| {
                        Error::invalid_argument(format!(
                            "Expected \"unhandledPromptBehavior\" key to be a prompt type, got {}",
                            truncate(name)
                        ))
                    })?;
                    let config = value
                        .as_str()
                        .and_then(|s| PromptHandlerConfiguration::parse(s, false))
                        .ok_or_else(|| {
                            Error::invalid_argument(format!(
                                "Expected \"{name}\" handler to be one of accept, dismiss, ignore, got {}",
                                pprint(value)
                            ))
                        })?;
                    handlers.insert(prompt_type, config);
                }
                Ok(Self {
                    fallback_default: None,
                    handlers,
                })
            }

            _ => Err(Error::invalid_argument(format!(
                "Expected \"unhandledPromptBehavior\" to be a string or an object, got {}",
                pprint(json)
            ))),
        }
    }

    /// Serializes back to the form the client sent.
    ///
    /// Returns `"dismiss and notify"` when nothing was configured.
    #[must_use]
    pub fn to_json(&self) -> Value {
        if self.handlers.is_empty() {
            let config = self
                .fallback_default
                .unwrap_or(PromptHandlerConfiguration::DEFAULT);
            return Value::String(config.as_string());
        }

        let mut out = Map::new();
        for prompt_type in PromptType::ALL {
            if let Some(config) = self.handlers.get(&prompt_type) {
                out.insert(prompt_type.as_str().to_string(), Value::String(config.as_string()));
            }
        }
        Value::Object(out)
    }
}

impl Serialize for UserPromptHandler {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

// ============================================================================
// Tests
// ============================================================================
