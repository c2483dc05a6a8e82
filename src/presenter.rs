//! Projection of a weather snapshot into display records
//!
//! No network access and no shared state: everything here is a function of
//! the snapshot, the place and today's date.

use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Place, WeatherSnapshot};
use crate::theme::Theme;
use crate::weather::{CodeInfo, Icon, describe};

/// Current conditions plus the forecast strip, ready to print
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherView {
    /// `name` or `name, CODE`
    pub label: String,
    /// e.g. "Friday, October 16"
    pub date: String,
    /// e.g. "21°"
    pub temperature: String,
    pub feels_like: String,
    pub humidity: String,
    pub wind: String,
    pub icon: Icon,
    pub description: &'static str,
    pub theme: Theme,
    pub forecast: Vec<ForecastDay>,
}

/// One card of the forecast strip
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastDay {
    pub date: NaiveDate,
    /// Short weekday, e.g. "Sat"
    pub day: String,
    pub icon: Icon,
    pub description: &'static str,
    pub high: String,
    pub low: String,
}

/// Build the view for `snapshot` at `place`.
///
/// Forecast days are the entries after today, at most five; a shorter daily
/// sequence just produces fewer cards. Forecast icons always use the daytime
/// variant.
#[must_use]
pub fn render(snapshot: &WeatherSnapshot, place: &Place, today: NaiveDate) -> WeatherView {
    let current = &snapshot.current;
    let info = describe(current.weather_code, current.is_day);

    let forecast = snapshot
        .upcoming()
        .map(|day| {
            let info = day
                .weather_code
                .map_or(CodeInfo::UNKNOWN, |code| describe(code, true));
            ForecastDay {
                date: day.date,
                day: day.date.format("%a").to_string(),
                icon: info.icon,
                description: info.description,
                high: degrees(day.temperature_max),
                low: degrees(day.temperature_min),
            }
        })
        .collect();

    WeatherView {
        label: place.label(),
        date: today.format("%A, %B %-d").to_string(),
        temperature: degrees(Some(current.temperature)),
        feels_like: degrees(Some(current.apparent_temperature)),
        humidity: format!("{}%", current.humidity),
        wind: format!("{} km/h", current.wind_speed),
        icon: info.icon,
        description: info.description,
        theme: Theme::select(current.weather_code, current.is_day),
        forecast,
    }
}

/// Nearest integer, halves rounded up (-2.5 becomes -2)
#[must_use]
pub fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

fn degrees(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{}°", round_half_up(v)),
        _ => "--°".to_string(),
    }
}

impl fmt::Display for WeatherView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "📍 {}  [{}]", self.label, self.theme)?;
        writeln!(f, "   {}", self.date)?;
        writeln!(
            f,
            "   {} {}  {}",
            self.icon.glyph(),
            self.temperature,
            self.description
        )?;
        writeln!(
            f,
            "   Feels like {} · Humidity {} · Wind {}",
            self.feels_like, self.humidity, self.wind
        )?;

        if !self.forecast.is_empty() {
            writeln!(f)?;
            for day in &self.forecast {
                writeln!(
                    f,
                    "   {:<4} {} {:>5} {:>5}  {}",
                    day.day,
                    day.icon.glyph(),
                    day.high,
                    day.low,
                    day.description
                )?;
            }
        }
        Ok(())
    }
}
