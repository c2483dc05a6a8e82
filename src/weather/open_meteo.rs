//! `OpenMeteo` geocoding and forecast client (no API key required)

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::{ForecastProvider, Geocoder};
use crate::config::WeatherConfig;
use crate::error::{LookupError, Stage};
use crate::models::{Coordinates, CurrentConditions, DailyEntry, Place, WeatherSnapshot};

const CURRENT_FIELDS: &str =
    "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,weather_code,wind_speed_10m";
const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min";

/// HTTP client for both Open-Meteo endpoints
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteoClient {
    /// Create a client from the `[weather]` configuration section
    pub fn new(config: &WeatherConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            geocoding_url: config.geocoding_url.trim_end_matches('/').to_string(),
            forecast_url: config.forecast_url.trim_end_matches('/').to_string(),
        })
    }

    fn search_url(&self, name: &str) -> String {
        format!(
            "{}/search?name={}&count=1&language=en&format=json",
            self.geocoding_url,
            urlencoding::encode(name)
        )
    }

    fn forecast_url(&self, coordinates: Coordinates) -> String {
        format!(
            "{}/forecast?latitude={}&longitude={}&current={CURRENT_FIELDS}&daily={DAILY_FIELDS}&timezone=auto",
            self.forecast_url, coordinates.latitude, coordinates.longitude
        )
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        stage: Stage,
    ) -> Result<T, LookupError> {
        debug!("OpenMeteo request URL: {}", url);
        let start_time = Instant::now();

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| LookupError::network(stage, e.to_string()))?;

        let body = response
            .json::<T>()
            .await
            .map_err(|e| LookupError::network(stage, format!("invalid response body: {e}")))?;

        let elapsed = start_time.elapsed();
        if elapsed.as_secs() > 5 {
            warn!("Slow {} response: {:.3}s", stage, elapsed.as_secs_f64());
        }

        Ok(body)
    }
}

#[async_trait]
impl Geocoder for OpenMeteoClient {
    #[instrument(skip(self))]
    async fn search(&self, name: &str) -> Result<Option<Place>, LookupError> {
        info!("Geocoding location: '{}'", name);

        let response: GeocodingResponse = self
            .get_json(&self.search_url(name), Stage::Geocoding)
            .await?;
        let place = response.into_first_place();

        if place.is_none() {
            warn!("No results found for location '{}'", name);
        }
        Ok(place)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoClient {
    #[instrument(skip(self), fields(lat = coordinates.latitude, lon = coordinates.longitude))]
    async fn forecast(&self, coordinates: Coordinates) -> Result<WeatherSnapshot, LookupError> {
        info!("Getting forecast for coordinates: {}", coordinates.format());

        let response: ForecastResponse = self
            .get_json(&self.forecast_url(coordinates), Stage::Forecast)
            .await?;

        response
            .into_snapshot()
            .map_err(|message| LookupError::network(Stage::Forecast, message))
    }
}

/// Geocoding response from `OpenMeteo`; `results` is absent when nothing matched
#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    results: Option<Vec<GeocodingResult>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country_code: Option<String>,
}

impl GeocodingResponse {
    fn into_first_place(self) -> Option<Place> {
        let first = self.results?.into_iter().next()?;
        let coordinates = Coordinates::new(first.latitude, first.longitude);
        Some(match first.country_code {
            Some(code) => Place::with_country(first.name, code, coordinates),
            None => Place::new(first.name, coordinates),
        })
    }
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentData,
    daily: DailyData,
}

#[derive(Debug, Deserialize)]
struct CurrentData {
    #[serde(rename = "temperature_2m")]
    temperature: f64,
    #[serde(rename = "relative_humidity_2m")]
    humidity: f64,
    apparent_temperature: f64,
    is_day: u8,
    weather_code: i32,
    #[serde(rename = "wind_speed_10m")]
    wind_speed: f64,
}

/// Daily arrays, indexed in parallel by day offset from today
#[derive(Debug, Deserialize)]
struct DailyData {
    time: Vec<String>,
    #[serde(default)]
    weather_code: Vec<Option<i32>>,
    #[serde(rename = "temperature_2m_max", default)]
    temperature_max: Vec<Option<f64>>,
    #[serde(rename = "temperature_2m_min", default)]
    temperature_min: Vec<Option<f64>>,
}

impl ForecastResponse {
    fn into_snapshot(self) -> Result<WeatherSnapshot, String> {
        let current = CurrentConditions {
            temperature: self.current.temperature,
            humidity: self.current.humidity,
            apparent_temperature: self.current.apparent_temperature,
            is_day: self.current.is_day != 0,
            weather_code: self.current.weather_code,
            wind_speed: self.current.wind_speed,
        };

        let daily = self
            .daily
            .time
            .iter()
            .enumerate()
            .map(|(i, time)| -> Result<DailyEntry, String> {
                let date = NaiveDate::parse_from_str(time, "%Y-%m-%d")
                    .map_err(|e| format!("invalid daily date '{time}': {e}"))?;
                Ok(DailyEntry {
                    date,
                    weather_code: self.daily.weather_code.get(i).copied().flatten(),
                    temperature_max: self.daily.temperature_max.get(i).copied().flatten(),
                    temperature_min: self.daily.temperature_min.get(i).copied().flatten(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(WeatherSnapshot { current, daily })
    }
}
