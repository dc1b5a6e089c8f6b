//! Error types for AwaasChat

use thiserror::Error;

/// Main error type for AwaasChat operations
#[derive(Debug, Error)]
pub enum AwaasError {
    /// Backend gateway error (non-success response, unreachable host)
    #[error("Gateway error: {0}")]
    Gateway(String),

    /// SSE stream error (read failure mid-stream)
    #[error("Stream error: {0}")]
    Stream(String),

    /// Document ingestion error
    #[error("Ingest error: {0}")]
    Ingest(String),

    /// Vector index error
    #[error("Index error: {0}")]
    Index(String),

    /// Speech synthesis error
    #[error("Speech error: {0}")]
    Speech(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Network/HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

/// Convenient Result type using AwaasError
pub type Result<T> = std::result::Result<T, AwaasError>;

impl AwaasError {
    /// Create a gateway error
    pub fn gateway(msg: impl Into<String>) -> Self {
        AwaasError::Gateway(msg.into())
    }

    /// Create a stream error
    pub fn stream(msg: impl Into<String>) -> Self {
        AwaasError::Stream(msg.into())
    }

    /// Create an ingest error
    pub fn ingest(msg: impl Into<String>) -> Self {
        AwaasError::Ingest(msg.into())
    }

    /// Create an index error
    pub fn index(msg: impl Into<String>) -> Self {
        AwaasError::Index(msg.into())
    }

    /// Create a speech error
    pub fn speech(msg: impl Into<String>) -> Self {
        AwaasError::Speech(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        AwaasError::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AwaasError::Validation(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        AwaasError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = AwaasError::gateway("backend unreachable");
        assert_eq!(err.to_string(), "Gateway error: backend unreachable");

        let err = AwaasError::ingest("empty document");
        assert_eq!(err.to_string(), "Ingest error: empty document");
    }

    #[test]
    fn test_result_type() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(returns_result().unwrap(), 42);
    }
}
