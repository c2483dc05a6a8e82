//! `Skypeek` - weather lookup by place name or device location
//!
//! This library resolves places through Open-Meteo geocoding, fetches current
//! conditions and a short daily forecast, and projects them into a themed
//! terminal view. A separate cache-first asset bucket keeps the application
//! shell available offline.

pub mod assets;
pub mod cache;
pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod lookup;
pub mod models;
pub mod presenter;
pub mod screen;
pub mod theme;
pub mod weather;

// Re-export core types for public API
pub use assets::{Asset, AssetCache, AssetFetcher, AssetManifest, HttpAssetFetcher};
pub use cache::{AssetBucket, AssetStore};
pub use config::SkypeekConfig;
pub use error::{LookupError, SkypeekError, Stage};
pub use location::{ConfiguredLocation, LocationError, LocationProvider};
pub use lookup::{Lookup, Outcome};
pub use models::{Coordinates, Place, WeatherSnapshot};
pub use presenter::{ForecastDay, WeatherView};
pub use screen::{Screen, ScreenSnapshot, UiState};
pub use theme::Theme;
pub use weather::{ForecastProvider, Geocoder, OpenMeteoClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, SkypeekError>;
