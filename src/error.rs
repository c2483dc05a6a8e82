//! Error types and handling for `Skypeek`

use thiserror::Error;

use crate::location::LocationError;

/// Ambient error type for configuration, storage and input problems
#[derive(Error, Debug)]
pub enum SkypeekError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Asset bucket errors
    #[error("Cache error: {message}")]
    Cache { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl SkypeekError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new cache error
    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            SkypeekError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            SkypeekError::Validation { message } => format!("Invalid input: {message}"),
            SkypeekError::Cache { .. } => {
                "Asset cache operation failed. You may need to reinstall the assets.".to_string()
            }
            SkypeekError::Io { .. } => {
                "Input/output operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

/// Which remote call a network failure happened in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Geocoding,
    Forecast,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Stage::Geocoding => write!(f, "geocoding"),
            Stage::Forecast => write!(f, "forecast"),
        }
    }
}

/// Everything a single weather lookup can fail with.
///
/// All variants are caught by the lookup orchestrator and turned into exactly
/// one banner message each; none of them escapes to the caller as a panic or
/// is retried.
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("no place matches {query:?}")]
    NotFound { query: String },

    #[error("{stage} request failed: {message}")]
    Network { stage: Stage, message: String },

    #[error("location permission denied or position unavailable")]
    Permission,

    #[error("device location is not supported")]
    Unsupported,
}

impl LookupError {
    pub fn network<S: Into<String>>(stage: Stage, message: S) -> Self {
        Self::Network {
            stage,
            message: message.into(),
        }
    }

    /// Banner text shown to the user
    #[must_use]
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::NotFound { .. } => "City not found. Please try again.",
            LookupError::Network {
                stage: Stage::Geocoding,
                ..
            } => "Failed to fetch data. Check your connection.",
            LookupError::Network {
                stage: Stage::Forecast,
                ..
            } => "Error retrieving weather data.",
            LookupError::Permission => "Permission denied or location unavailable.",
            LookupError::Unsupported => "Geolocation is not supported on this device.",
        }
    }
}

impl From<LocationError> for LookupError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied | LocationError::PositionUnavailable => {
                LookupError::Permission
            }
            LocationError::Unsupported => LookupError::Unsupported,
        }
    }
}
