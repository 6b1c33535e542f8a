//! Result and error types for admin step helpers.

use thiserror::Error;

/// Result type for step operations
pub type StepResult<T> = Result<T, StepError>;

/// Errors raised by step helpers and the sessions they drive
#[derive(Debug, Error)]
pub enum StepError {
    /// Lookup returned nothing where presence was required
    #[error("Element matching {selector} not found (looking for {what} \"{value}\")")]
    ElementNotFound {
        /// Selector expression that was evaluated
        selector: String,
        /// What the caller searched by (e.g. "text")
        what: String,
        /// The searched value
        value: String,
    },

    /// Element present but not rendered
    #[error("{message}")]
    ElementNotVisible {
        /// Error message
        message: String,
    },

    /// Element found where absence was required
    #[error("{message}")]
    UnexpectedElementPresent {
        /// Error message
        message: String,
    },

    /// The session lacks a capability the operation needs
    #[error("Missing capability: {capability} is required by {operation}")]
    MissingCapability {
        /// Capability name
        capability: String,
        /// Operation that required it
        operation: String,
    },

    /// Bounded wait exceeded
    #[error("Timed out after {ms}ms waiting for {waited_for}")]
    Timeout {
        /// Description of the awaited condition
        waited_for: String,
        /// Timeout in milliseconds
        ms: u64,
    },

    /// No `<option>` with the requested label
    #[error("Option \"{label}\" not found in select \"{field}\"")]
    OptionNotFound {
        /// Select element id
        field: String,
        /// Visible option label
        label: String,
    },

    /// The underlying browser session failed
    #[error("Session error: {message}")]
    Session {
        /// Error message
        message: String,
    },

    /// Step text matched no known phrase
    #[error("No step matches \"{text}\"")]
    UnknownStep {
        /// Step text
        text: String,
    },

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}

impl StepError {
    /// Create a session error
    #[must_use]
    pub fn session(message: impl Into<String>) -> Self {
        Self::Session {
            message: message.into(),
        }
    }

    /// Whether this error is an assertion failure rather than an infrastructure fault
    #[must_use]
    pub const fn is_assertion(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::ElementNotVisible { .. }
                | Self::UnexpectedElementPresent { .. }
                | Self::Timeout { .. }
                | Self::OptionNotFound { .. }
        )
    }
}
