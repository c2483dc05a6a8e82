//! Visual theme chosen from the current weather

use serde::Serialize;

/// One of five mutually exclusive themes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Night,
    Sunny,
    Cloudy,
    Rainy,
    Snow,
}

impl Theme {
    /// Pick the theme for a weather code and daylight flag.
    ///
    /// Rules are checked in order and the first match wins; night beats any
    /// code. Every `i32` maps to a theme.
    #[must_use]
    pub fn select(code: i32, is_day: bool) -> Self {
        if !is_day {
            return Theme::Night;
        }

        match code {
            0 | 1 => Theme::Sunny,
            2..=48 => Theme::Cloudy,
            51..=65 => Theme::Rainy,
            71..=77 => Theme::Snow,
            95.. => Theme::Rainy,
            _ => Theme::Cloudy,
        }
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Theme::Night => "night",
            Theme::Sunny => "sunny",
            Theme::Cloudy => "cloudy",
            Theme::Rainy => "rainy",
            Theme::Snow => "snow",
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
