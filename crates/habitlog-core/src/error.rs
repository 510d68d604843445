//! Core error types for habitlog-core.
//!
//! This module defines the error hierarchy using thiserror. Remote failures
//! carry an optional human-readable message so the sync engine can fall back
//! to a fixed string when the transport gives it nothing to show.

use std::path::PathBuf;
use thiserror::Error;

/// Message shown when a remote failure carries no description.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// Core error type for habitlog-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Remote log store errors
    #[error("Remote error: {0}")]
    Remote(#[from] RemoteError),

    /// Reminder scheduling errors
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Failure talking to the remote log store (transport, status or parse).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{}", self.display_message())]
pub struct RemoteError {
    message: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    /// A failure with no description at all.
    pub fn unknown() -> Self {
        Self { message: None }
    }

    /// The raw description, if the failure had one.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The description, or [`UNKNOWN_ERROR`] when there is none.
    pub fn display_message(&self) -> &str {
        self.message.as_deref().unwrap_or(UNKNOWN_ERROR)
    }
}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::new(err.to_string())
    }
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Reminder scheduling errors.
///
/// None of these reach the user; callers log them and carry on.
#[derive(Error, Debug)]
pub enum SchedulerError {
    /// The host refused a timer registration
    #[error("Timer registration for '{identity}' rejected: {message}")]
    RegistrationRejected { identity: String, message: String },

    /// The host failed to cancel a registration
    #[error("Timer cancellation for '{identity}' failed: {message}")]
    CancelFailed { identity: String, message: String },

    /// The persisted record could not be read or written
    #[error("Schedule record '{key}' unavailable: {message}")]
    Record { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_error_without_message_falls_back() {
        let err = RemoteError::unknown();
        assert_eq!(err.message(), None);
        assert_eq!(err.to_string(), "Unknown error");
    }

    #[test]
    fn remote_error_keeps_message_verbatim() {
        let err = RemoteError::new("Network error");
        assert_eq!(err.message(), Some("Network error"));
        assert_eq!(err.to_string(), "Network error");
    }

    #[test]
    fn core_error_wraps_remote() {
        let err: CoreError = RemoteError::new("timeout").into();
        assert_eq!(err.to_string(), "Remote error: timeout");
    }
}
