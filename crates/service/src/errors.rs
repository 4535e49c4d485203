//! Service error types

use fixthegap_model::ModelError;
use thiserror::Error;

/// Prediction service errors
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("Market lookup failed: {0}")]
    MarketLookup(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Timeout")]
    Timeout,

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// True for bad client input (unknown labels, invalid numbers)
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ServiceError::Model(ModelError::UnknownLabel { .. })
                | ServiceError::Model(ModelError::InvalidInput(_))
        )
    }

    /// Allowed values when an unknown categorical label was given
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            ServiceError::Model(err) => err.allowed_values(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ServiceError::Timeout
        } else if err.is_decode() {
            ServiceError::SerializationError(err.to_string())
        } else {
            ServiceError::NetworkError(err.to_string())
        }
    }
}

impl From<tokio::time::error::Elapsed> for ServiceError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        ServiceError::Timeout
    }
}
