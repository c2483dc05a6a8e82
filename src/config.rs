//! Configuration management for `Skypeek`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::SkypeekError;
use crate::cache::validate_bucket_name;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `Skypeek` application
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SkypeekConfig {
    /// Open-Meteo endpoints and HTTP client settings
    pub weather: WeatherConfig,
    /// Device location provider settings
    pub device: DeviceConfig,
    /// Offline asset bucket settings
    pub assets: AssetsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Weather API configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    /// Base URL of the geocoding API (without `/search`)
    pub geocoding_url: String,
    /// Base URL of the forecast API (without `/forecast`)
    pub forecast_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u32,
    /// User agent sent with every request
    pub user_agent: String,
}

/// Device location settings.
///
/// A terminal has no location sensor, so the "device" position is whatever
/// the user configured. Leaving both coordinates out means the capability is
/// not available at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Whether lookups may read the device position
    pub allow: bool,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Offline asset bucket settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// Bucket name; changing it abandons the previous bucket
    pub bucket: String,
    /// Directory holding the asset database
    pub location: PathBuf,
    /// Origin that relative manifest paths resolve against
    pub origin: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    /// Log format (pretty or json)
    pub format: String,
}

// Default value functions
fn default_geocoding_url() -> String {
    "https://geocoding-api.open-meteo.com/v1".to_string()
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1".to_string()
}

fn default_weather_timeout() -> u32 {
    30
}

fn default_user_agent() -> String {
    format!("Skypeek/{}", crate::VERSION)
}

fn default_bucket() -> String {
    "weather-app-v1".to_string()
}

fn default_assets_location() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from(".cache"))
        .join("skypeek")
        .join("assets")
}

fn default_origin() -> String {
    "http://localhost:8080".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            geocoding_url: default_geocoding_url(),
            forecast_url: default_forecast_url(),
            timeout_seconds: default_weather_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            allow: true,
            latitude: None,
            longitude: None,
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            bucket: default_bucket(),
            location: default_assets_location(),
            origin: default_origin(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SkypeekConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // SKYPEEK_WEATHER__TIMEOUT_SECONDS=10 style overrides
        builder = builder.add_source(
            Environment::with_prefix("SKYPEEK")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: SkypeekConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skypeek").join("config.toml"))
    }

    /// Apply default values to fields left empty
    pub fn apply_defaults(&mut self) {
        if self.weather.geocoding_url.is_empty() {
            self.weather.geocoding_url = default_geocoding_url();
        }
        if self.weather.forecast_url.is_empty() {
            self.weather.forecast_url = default_forecast_url();
        }
        if self.weather.timeout_seconds == 0 {
            self.weather.timeout_seconds = default_weather_timeout();
        }
        if self.weather.user_agent.is_empty() {
            self.weather.user_agent = default_user_agent();
        }
        if self.assets.bucket.is_empty() {
            self.assets.bucket = default_bucket();
        }
        if self.assets.location.as_os_str().is_empty() {
            self.assets.location = default_assets_location();
        }
        if self.assets.origin.is_empty() {
            self.assets.origin = default_origin();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.weather.timeout_seconds > 300 {
            return Err(
                SkypeekError::config("Weather API timeout cannot exceed 300 seconds").into(),
            );
        }

        if let Some(latitude) = self.device.latitude {
            if !(-90.0..=90.0).contains(&latitude) {
                return Err(SkypeekError::config(format!(
                    "Device latitude {latitude} is outside -90..=90"
                ))
                .into());
            }
        }

        if let Some(longitude) = self.device.longitude {
            if !(-180.0..=180.0).contains(&longitude) {
                return Err(SkypeekError::config(format!(
                    "Device longitude {longitude} is outside -180..=180"
                ))
                .into());
            }
        }

        Ok(())
    }

    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkypeekError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkypeekError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Geocoding", &self.weather.geocoding_url),
            ("Forecast", &self.weather.forecast_url),
            ("Asset origin", &self.assets.origin),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkypeekError::config(format!(
                    "{name} URL must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        validate_bucket_name(&self.assets.bucket)
            .map_err(|e| SkypeekError::config(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = SkypeekConfig::default();
        assert_eq!(config.weather.forecast_url, "https://api.open-meteo.com/v1");
        assert_eq!(
            config.weather.geocoding_url,
            "https://geocoding-api.open-meteo.com/v1"
        );
        assert_eq!(config.weather.timeout_seconds, 30);
        assert_eq!(config.assets.bucket, "weather-app-v1");
        assert_eq!(config.logging.level, "info");
        assert!(config.device.allow);
        assert!(config.device.latitude.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = SkypeekConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_numeric_ranges() {
        let mut config = SkypeekConfig::default();
        config.weather.timeout_seconds = 500;
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("timeout cannot exceed"));
    }

    #[test]
    fn test_config_validation_device_coordinates() {
        let mut config = SkypeekConfig::default();
        config.device.latitude = Some(91.0);
        assert!(config.validate().is_err());

        config.device.latitude = Some(48.85);
        config.device.longitude = Some(-181.0);
        assert!(config.validate().is_err());

        config.device.longitude = Some(2.35);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_rejects_bad_bucket_name() {
        let mut config = SkypeekConfig::default();
        config.assets.bucket = "weather app/v1".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_non_http_url() {
        let mut config = SkypeekConfig::default();
        config.weather.forecast_url = "ftp://example.com".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("Forecast URL"));
    }

    #[test]
    fn test_apply_defaults_fills_empty_fields() {
        let mut config = SkypeekConfig::default();
        config.weather.forecast_url.clear();
        config.assets.bucket.clear();
        config.weather.timeout_seconds = 0;
        config.apply_defaults();
        assert_eq!(config.weather.forecast_url, "https://api.open-meteo.com/v1");
        assert_eq!(config.assets.bucket, "weather-app-v1");
        assert_eq!(config.weather.timeout_seconds, 30);
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            "[device]\nlatitude = 48.85\nlongitude = 2.35\n\n[assets]\nbucket = \"weather-app-v2\"\n"
        )
        .unwrap();

        let config = SkypeekConfig::load_from_path(Some(file.path().to_path_buf())).unwrap();
        assert_eq!(config.device.latitude, Some(48.85));
        assert_eq!(config.device.longitude, Some(2.35));
        assert_eq!(config.assets.bucket, "weather-app-v2");
        assert_eq!(config.weather.timeout_seconds, 30);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = SkypeekConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("skypeek"));
            assert!(path.to_string_lossy().ends_with("config.toml"));
        }
    }
}
