//! Device location provider
//!
//! A single-shot request for the current position that yields coordinates or
//! a denial/unavailability signal.

use async_trait::async_trait;
use thiserror::Error;

use crate::config::DeviceConfig;
use crate::models::Coordinates;

/// Why the device position could not be read
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location unavailable")]
    PositionUnavailable,
    #[error("Location service not supported")]
    Unsupported,
}

/// Source of the device's current position
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<Coordinates, LocationError>;
}

/// Position taken from the `[device]` configuration section
#[derive(Debug, Clone)]
pub struct ConfiguredLocation {
    allow: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl ConfiguredLocation {
    #[must_use]
    pub fn from_config(config: &DeviceConfig) -> Self {
        Self {
            allow: config.allow,
            latitude: config.latitude,
            longitude: config.longitude,
        }
    }
}

#[async_trait]
impl LocationProvider for ConfiguredLocation {
    async fn current_position(&self) -> Result<Coordinates, LocationError> {
        match (self.latitude, self.longitude) {
            (None, None) => Err(LocationError::Unsupported),
            _ if !self.allow => Err(LocationError::PermissionDenied),
            (Some(latitude), Some(longitude)) => {
                tracing::info!("Got location: {}, {}", latitude, longitude);
                Ok(Coordinates::new(latitude, longitude))
            }
            _ => Err(LocationError::PositionUnavailable),
        }
    }
}
