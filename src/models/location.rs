//! Place model for resolved geographic coordinates

use serde::{Deserialize, Serialize};

/// Display name used for lookups that start from the device position
pub const DEVICE_PLACE_NAME: &str = "Your Location";

/// Latitude/longitude pair in decimal degrees
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Format as a `lat, lon` string with four decimals
    #[must_use]
    pub fn format(&self) -> String {
        format!("{:.4}, {:.4}", self.latitude, self.longitude)
    }
}

/// A place resolved for one lookup. Never cached or stored.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Place {
    /// Place name (city, town, or the device placeholder)
    pub name: String,
    /// Country code (ISO 3166-1 alpha-2)
    pub country_code: Option<String>,
    pub coordinates: Coordinates,
}

impl Place {
    /// Create a new place without a country code
    #[must_use]
    pub fn new(name: impl Into<String>, coordinates: Coordinates) -> Self {
        Self {
            name: name.into(),
            country_code: None,
            coordinates,
        }
    }

    /// Create a place with a country code; blank codes are dropped
    #[must_use]
    pub fn with_country(
        name: impl Into<String>,
        country_code: impl Into<String>,
        coordinates: Coordinates,
    ) -> Self {
        let code = country_code.into();
        Self {
            name: name.into(),
            country_code: (!code.trim().is_empty()).then_some(code),
            coordinates,
        }
    }

    /// The placeholder place for a device position
    #[must_use]
    pub fn device(coordinates: Coordinates) -> Self {
        Self::new(DEVICE_PLACE_NAME, coordinates)
    }

    /// `name` plus `, CODE` when a country code is known
    #[must_use]
    pub fn label(&self) -> String {
        match &self.country_code {
            Some(code) => format!("{}, {}", self.name, code),
            None => self.name.clone(),
        }
    }
}
