//! Core error types for termscan.
//!
//! This module defines the central error type used across all subsystems.
//! Each subsystem error is represented as a variant for clear error propagation.

use thiserror::Error;

/// Central error type for all termscan operations.
///
/// Each variant represents an error from a specific subsystem, allowing
/// for clear error propagation and handling across module boundaries.
#[derive(Error, Debug)]
pub enum TermscanError {
    /// Settings errors (file loading, parsing, validation)
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Blocked-term database errors (parsing, compilation)
    #[error("term database error: {0}")]
    BlockDb(String),

    /// Allow-list store errors (parsing, lookup)
    #[error("allow-list error: {0}")]
    AllowDb(String),

    /// Search primitive errors (spawn, timeout)
    #[error("search error: {0}")]
    Search(String),

    /// Validation errors (invalid input, constraints)
    #[error("validation error: {0}")]
    Validation(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Settings-specific errors.
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Failed to parse TOML
    #[error("failed to parse settings TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// I/O error reading settings
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid settings value
    #[error("invalid settings value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias using `TermscanError`.
pub type Result<T> = std::result::Result<T, TermscanError>;

/// Result type alias for settings operations.
pub type SettingsResult<T> = std::result::Result<T, SettingsError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TermscanError::Validation("bad finding line".to_string());
        assert_eq!(err.to_string(), "validation error: bad finding line");

        let err = SettingsError::InvalidValue {
            field: "workers".to_string(),
            reason: "must be at least 1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid settings value for workers: must be at least 1"
        );
    }

    #[test]
    fn test_error_from_settings() {
        let settings_err = SettingsError::InvalidValue {
            field: "search_timeout_secs".to_string(),
            reason: "must be non-zero".to_string(),
        };
        let err: TermscanError = settings_err.into();
        assert!(matches!(err, TermscanError::Settings(_)));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: TermscanError = io_err.into();
        assert!(matches!(err, TermscanError::Io(_)));
    }
}
