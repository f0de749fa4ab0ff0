//! Error handling module for Claude Tool Tracker.
//!
//! This module provides a unified error type using the `thiserror` crate.
//! Inner components mostly degrade to defaults; errors that do propagate are
//! turned into a non-blocking hook response by the hook handler.

use std::io;
use thiserror::Error;

/// Unified error type for the tool tracker.
#[derive(Error, Debug)]
pub enum TrackerError {
    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed hook input or CLI argument
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for tracker operations
pub type Result<T> = std::result::Result<T, TrackerError>;

impl TrackerError {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        TrackerError::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        TrackerError::InvalidInput(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            TrackerError::config("bad theme").to_string(),
            "Configuration error: bad theme"
        );
        assert_eq!(
            TrackerError::invalid_input("no json").to_string(),
            "Invalid input: no json"
        );
    }

    #[test]
    fn test_json_error_conversion() {
        let err: TrackerError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("JSON parsing error"));
    }
}
