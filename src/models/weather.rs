//! Weather snapshot model, as returned by the forecast collaborator

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Current conditions at the queried coordinates
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    /// Temperature in Celsius
    pub temperature: f64,
    /// Relative humidity percentage
    pub humidity: f64,
    /// Apparent ("feels like") temperature in Celsius
    pub apparent_temperature: f64,
    /// Whether the observation time falls in daylight
    pub is_day: bool,
    /// WMO weather code
    pub weather_code: i32,
    /// Wind speed in km/h
    pub wind_speed: f64,
}

/// One day of the daily forecast. Fields the API left `null` are `None`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DailyEntry {
    pub date: NaiveDate,
    pub weather_code: Option<i32>,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
}

/// Current conditions plus the daily sequence, index 0 being today
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WeatherSnapshot {
    pub current: CurrentConditions,
    pub daily: Vec<DailyEntry>,
}

impl WeatherSnapshot {
    /// Number of days shown after today
    pub const FORECAST_DAYS: usize = 5;

    /// Up to five days starting the day after today.
    ///
    /// Shorter sequences yield fewer days; nothing here can fail.
    pub fn upcoming(&self) -> impl Iterator<Item = &DailyEntry> {
        self.daily.iter().skip(1).take(Self::FORECAST_DAYS)
    }
}
