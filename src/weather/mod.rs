//! Remote weather collaborators
//!
//! The lookup orchestrator only sees the two traits below; `open_meteo`
//! provides the HTTP implementation of both.

use async_trait::async_trait;

use crate::error::LookupError;
use crate::models::{Coordinates, Place, WeatherSnapshot};

pub mod codes;
pub mod open_meteo;

pub use codes::{CodeInfo, Icon, describe};
pub use open_meteo::OpenMeteoClient;

/// Resolves a free-text place name to coordinates
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Best match for `name`, or `None` when nothing matches.
    ///
    /// Transport and decoding failures are `LookupError::Network`.
    async fn search(&self, name: &str) -> Result<Option<Place>, LookupError>;
}

/// Fetches current conditions and the daily forecast for coordinates
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn forecast(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, LookupError>;
}
