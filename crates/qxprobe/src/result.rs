//! Result and error types for Qxprobe.

use thiserror::Error;

/// Result type for Qxprobe operations
pub type QxResult<T> = Result<T, QxError>;

/// Errors that can occur in Qxprobe
#[derive(Debug, Error)]
pub enum QxError {
    /// Malformed locator, path step or attribute pattern
    #[error("Syntax error: {message}")]
    Syntax {
        /// Error message
        message: String,
    },

    /// Root object, named object or element absent
    #[error("Not found: {message}")]
    NotFound {
        /// Error message
        message: String,
    },

    /// A class step needs the host type registry, which is not available
    #[error("Type registry unavailable: cannot resolve class step '{step}'")]
    TypeRegistryUnavailable {
        /// The class step that needed the registry
        step: String,
    },

    /// Operation not supported for this locator or host
    #[error("Not implemented: {message}")]
    NotImplemented {
        /// Error message
        message: String,
    },

    /// Host rejected a synthetic event
    #[error("Event dispatch failed: {message}")]
    EventDispatch {
        /// Error message
        message: String,
    },

    /// Malformed widget snapshot document
    #[error("Invalid snapshot: {message}")]
    Snapshot {
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

impl QxError {
    /// Create a syntax error
    #[must_use]
    pub fn syntax(message: impl Into<String>) -> Self {
        Self::Syntax {
            message: message.into(),
        }
    }

    /// Create a not-found error
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a not-implemented error
    #[must_use]
    pub fn not_implemented(message: impl Into<String>) -> Self {
        Self::NotImplemented {
            message: message.into(),
        }
    }

    /// Create an event dispatch error
    #[must_use]
    pub fn event_dispatch(message: impl Into<String>) -> Self {
        Self::EventDispatch {
            message: message.into(),
        }
    }

    /// Create a snapshot error
    #[must_use]
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::Snapshot {
            message: message.into(),
        }
    }

    /// Whether this error means "nothing matched" rather than a broken request
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
