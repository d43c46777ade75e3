//! Error types and utilities for streamlens

use thiserror::Error;

/// Result type alias for streamlens operations
pub type Result<T> = std::result::Result<T, StreamlensError>;

/// Main error type for streamlens operations
#[derive(Error, Debug)]
pub enum StreamlensError {
    /// Configuration related errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O related errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed or out-of-range input handed to the aggregator.
    /// Carries the identifier of the offending record when known.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        record: Option<String>,
    },

    /// The upstream platform API could not be reached or answered with a
    /// server-side failure. Propagated unchanged by the aggregator.
    #[error("Source unavailable: {message}")]
    SourceUnavailable {
        message: String,
        status_code: Option<u16>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The upstream platform API rejected the supplied credentials.
    /// Never retried.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Network related errors (HTTP transport, not API semantics)
    #[error("Network error: {message}")]
    Network {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error with custom message
    #[error("{message}")]
    Generic {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl StreamlensError {
    /// Create a new generic error with a custom message
    pub fn new(msg: impl Into<String>) -> Self {
        Self::Generic {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new generic error with a custom message and source
    pub fn with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Generic {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source
    pub fn config_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
            record: None,
        }
    }

    /// Create a new invalid-input error naming the offending record
    pub fn invalid_input_record(msg: impl Into<String>, record: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: msg.into(),
            record: Some(record.into()),
        }
    }

    /// Create a new source-unavailable error
    pub fn source_unavailable(msg: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
            status_code: None,
            source: None,
        }
    }

    /// Create a new source-unavailable error with an HTTP status code
    pub fn source_unavailable_with_status(msg: impl Into<String>, status: u16) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
            status_code: Some(status),
            source: None,
        }
    }

    /// Create a new source-unavailable error with source
    pub fn source_unavailable_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::SourceUnavailable {
            message: msg.into(),
            status_code: None,
            source: Some(Box::new(source)),
        }
    }

    /// Create a new invalid-credentials error
    pub fn invalid_credentials(msg: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network {
            message: msg.into(),
            source: None,
        }
    }

    /// Create a new network error with source
    pub fn network_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Network {
            message: msg.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error originated in an external data source.
    /// Such errors are pass-through failures for the aggregator.
    pub fn is_source_error(&self) -> bool {
        matches!(
            self,
            Self::SourceUnavailable { .. } | Self::InvalidCredentials { .. }
        )
    }
}

// Error conversion implementations for external types

/// Convert from reqwest::Error to StreamlensError
impl From<reqwest::Error> for StreamlensError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::source_unavailable_with_source("Request timeout", err)
        } else if err.is_connect() {
            Self::source_unavailable_with_source("Connection failed", err)
        } else if err.is_status() {
            let status = err.status().map(|s| s.as_u16()).unwrap_or(0);
            match status {
                401 | 403 => Self::InvalidCredentials {
                    message: format!("API rejected credentials: HTTP {}", status),
                    source: Some(Box::new(err)),
                },
                _ => Self::SourceUnavailable {
                    message: format!("HTTP error: {}", status),
                    status_code: Some(status),
                    source: Some(Box::new(err)),
                },
            }
        } else {
            Self::network_with_source("Network request failed", err)
        }
    }
}

/// Convert from toml::de::Error to StreamlensError
impl From<toml::de::Error> for StreamlensError {
    fn from(err: toml::de::Error) -> Self {
        Self::config_with_source("TOML parsing error", err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{error::Error, io};

    #[test]
    fn test_error_creation() {
        let error = StreamlensError::new("test message");
        assert!(error.to_string().contains("test message"));

        let config_error = StreamlensError::config("config issue");
        assert!(config_error.to_string().contains("Configuration error"));

        let input_error =
            StreamlensError::invalid_input_record("negative revenue", "song-0042");
        assert!(input_error.to_string().contains("Invalid input"));
        match input_error {
            StreamlensError::InvalidInput { record, .. } => {
                assert_eq!(record.as_deref(), Some("song-0042"));
            }
            _ => panic!("expected InvalidInput"),
        }

        let unavailable = StreamlensError::source_unavailable_with_status("down", 503);
        assert!(unavailable.to_string().contains("Source unavailable"));
        assert!(unavailable.is_source_error());

        let credentials = StreamlensError::invalid_credentials("bad key");
        assert!(credentials.to_string().contains("Invalid credentials"));
        assert!(credentials.is_source_error());
    }

    #[test]
    fn test_error_with_source() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let wrapped = StreamlensError::with_source("Failed to read file", io_error);

        assert!(wrapped.to_string().contains("Failed to read file"));
        assert!(wrapped.source().is_some());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = io::Error::new(io::ErrorKind::NotFound, "File not found");
        let error: StreamlensError = io_error.into();

        assert!(error.to_string().contains("I/O error"));
        assert!(error.source().is_some());
    }

    #[test]
    fn test_serde_error_conversion() {
        let invalid_json = r#"{"invalid": json}"#;
        let serde_error = serde_json::from_str::<serde_json::Value>(invalid_json).unwrap_err();
        let error: StreamlensError = serde_error.into();

        assert!(error.to_string().contains("Serialization error"));
    }

    #[test]
    fn test_aggregator_errors_are_not_source_errors() {
        assert!(!StreamlensError::invalid_input("bad record").is_source_error());
        assert!(!StreamlensError::config("bad setting").is_source_error());
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<String> {
            Ok("success".to_string())
        }

        assert_eq!(returns_result().unwrap(), "success");
    }
}
