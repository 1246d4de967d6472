//! Core error types for kiezplan-core.
//!
//! The planning engine itself is infallible: it treats missing data as a
//! neutral signal. Errors come from the layers around it, loading
//! configuration and validating caller input before it reaches the engine.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for kiezplan-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

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

    /// Could not locate the configuration directory
    #[error("Could not determine configuration directory")]
    NoConfigDir,
}

/// Validation errors for caller-supplied records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Earliest start is after latest start
    #[error("Invalid start window: earliest ({earliest}) is after latest ({latest})")]
    InvalidStartWindow {
        earliest: chrono::NaiveTime,
        latest: chrono::NaiveTime,
    },

    /// A feature that must lie in [0, 1] does not
    #[error("Value for '{field}' must be within [0, 1], got {value}")]
    OutOfUnitRange { field: String, value: f64 },

    /// Two records share an id
    #[error("Duplicate id: {0}")]
    DuplicateId(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl ValidationError {
    pub(crate) fn unit_range(field: impl Into<String>, value: f64) -> Result<(), Self> {
        if (0.0..=1.0).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::OutOfUnitRange {
                field: field.into(),
                value,
            })
        }
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::InvalidValue {
            key: "<file>".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
