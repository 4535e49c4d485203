//! Error types for the model crate

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading, validating or evaluating model artifacts
#[derive(Error, Debug)]
pub enum ModelError {
    /// A categorical label is not part of the encoder's known classes
    #[error("Unknown {feature} '{label}'. Allowed values: {}", .allowed.join(", "))]
    UnknownLabel {
        feature: String,
        label: String,
        allowed: Vec<String>,
    },

    /// Invalid model parameters
    #[error("Invalid model parameters: {0}")]
    InvalidParameters(String),

    /// Invalid encoder classes
    #[error("Invalid {feature} encoder: {reason}")]
    InvalidEncoder { feature: String, reason: String },

    /// Invalid prediction input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Reference dataset problem
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// I/O error with the offending path
    #[error("I/O error for {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// CSV parsing error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ModelError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ModelError::Io {
            path: path.into(),
            source,
        }
    }

    /// Allowed values when this is a validation failure on a categorical label
    pub fn allowed_values(&self) -> Option<&[String]> {
        match self {
            ModelError::UnknownLabel { allowed, .. } => Some(allowed),
            _ => None,
        }
    }
}

/// Result type for model operations
pub type Result<T> = std::result::Result<T, ModelError>;
