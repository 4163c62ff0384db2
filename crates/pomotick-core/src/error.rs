//! Core error types for pomotick-core.
//!
//! None of these are fatal to the timer: storage and notification failures are
//! logged by the controller and the session keeps ticking.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomotick-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected user input (durations, interval, goal, identifiers).
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput { field: String, message: String },

    /// The durable store could not be read or written.
    #[error("Storage unavailable at {path}: {source}")]
    StorageUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The stored snapshot failed to parse or failed shape validation.
    #[error("Corrupt snapshot: {0}")]
    CorruptSnapshot(String),

    /// Notifications were not permitted by the user or the platform.
    #[error("Notification permission denied")]
    PermissionDenied,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CoreError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        CoreError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::StorageUnavailable {
            path: path.into(),
            source,
        }
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

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_input_names_the_field() {
        let err = CoreError::invalid_input("focus", "must be a positive number of minutes");
        assert_eq!(
            err.to_string(),
            "Invalid value for 'focus': must be a positive number of minutes"
        );
    }

    #[test]
    fn storage_error_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only");
        let err = CoreError::storage("/tmp/state.json", io);
        assert!(err.to_string().contains("/tmp/state.json"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
