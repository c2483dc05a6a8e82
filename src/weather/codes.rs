//! WMO weather code lookup: icon and description per code
//!
//! Codes from <https://open-meteo.com/en/docs#weathervariables>. The table is
//! total: codes it does not list fall back to a plain cloud and "Unknown".

use serde::Serialize;

/// Icon shown next to a weather description
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Icon {
    ClearDay,
    ClearNight,
    MostlyClearDay,
    MostlyClearNight,
    Cloud,
    Overcast,
    Fog,
    Drizzle,
    Rain,
    HeavyRain,
    LightSnow,
    Snow,
    HeavySnow,
    Thunderstorm,
}

impl Icon {
    /// Stable identifier, e.g. `"rain"`
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Icon::ClearDay => "clear-day",
            Icon::ClearNight => "clear-night",
            Icon::MostlyClearDay => "mostly-clear-day",
            Icon::MostlyClearNight => "mostly-clear-night",
            Icon::Cloud => "cloud",
            Icon::Overcast => "overcast",
            Icon::Fog => "fog",
            Icon::Drizzle => "drizzle",
            Icon::Rain => "rain",
            Icon::HeavyRain => "heavy-rain",
            Icon::LightSnow => "light-snow",
            Icon::Snow => "snow",
            Icon::HeavySnow => "heavy-snow",
            Icon::Thunderstorm => "thunderstorm",
        }
    }

    /// Terminal glyph
    #[must_use]
    pub fn glyph(self) -> &'static str {
        match self {
            Icon::ClearDay => "☀️",
            Icon::ClearNight => "🌙",
            Icon::MostlyClearDay => "🌤️",
            Icon::MostlyClearNight => "🌙",
            Icon::Cloud => "☁️",
            Icon::Overcast => "☁️",
            Icon::Fog => "🌫️",
            Icon::Drizzle => "🌦️",
            Icon::Rain => "🌧️",
            Icon::HeavyRain => "🌧️",
            Icon::LightSnow => "🌨️",
            Icon::Snow => "❄️",
            Icon::HeavySnow => "❄️",
            Icon::Thunderstorm => "⛈️",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// What a weather code looks like on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeInfo {
    pub icon: Icon,
    pub description: &'static str,
}

impl CodeInfo {
    /// Fallback for codes missing from the table
    pub const UNKNOWN: CodeInfo = CodeInfo {
        icon: Icon::Cloud,
        description: "Unknown",
    };

    const fn new(icon: Icon, description: &'static str) -> Self {
        Self { icon, description }
    }
}

/// Look up the icon and description for `code`.
///
/// `is_day` only matters for codes 0 and 1, which have night variants.
#[must_use]
pub fn describe(code: i32, is_day: bool) -> CodeInfo {
    match code {
        0 if is_day => CodeInfo::new(Icon::ClearDay, "Clear Sky"),
        0 => CodeInfo::new(Icon::ClearNight, "Clear Sky"),
        1 if is_day => CodeInfo::new(Icon::MostlyClearDay, "Mainly Clear"),
        1 => CodeInfo::new(Icon::MostlyClearNight, "Mainly Clear"),
        2 => CodeInfo::new(Icon::Cloud, "Partly Cloudy"),
        3 => CodeInfo::new(Icon::Overcast, "Overcast"),
        45 => CodeInfo::new(Icon::Fog, "Foggy"),
        48 => CodeInfo::new(Icon::Fog, "Rime Fog"),
        51 => CodeInfo::new(Icon::Drizzle, "Light Drizzle"),
        53 => CodeInfo::new(Icon::Drizzle, "Moderate Drizzle"),
        55 => CodeInfo::new(Icon::Drizzle, "Dense Drizzle"),
        61 => CodeInfo::new(Icon::Rain, "Slight Rain"),
        63 => CodeInfo::new(Icon::Rain, "Moderate Rain"),
        65 => CodeInfo::new(Icon::HeavyRain, "Heavy Rain"),
        71 => CodeInfo::new(Icon::LightSnow, "Slight Snow"),
        73 => CodeInfo::new(Icon::Snow, "Moderate Snow"),
        75 => CodeInfo::new(Icon::HeavySnow, "Heavy Snow"),
        95 => CodeInfo::new(Icon::Thunderstorm, "Thunderstorm"),
        96 => CodeInfo::new(Icon::Thunderstorm, "Hailstorm"),
        99 => CodeInfo::new(Icon::Thunderstorm, "Heavy Thunderstorm"),
        _ => CodeInfo::UNKNOWN,
    }
}
