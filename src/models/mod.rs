//! Data models for the Skypeek application
//!
//! - Location: resolved places and raw coordinates
//! - Weather: the current-conditions plus daily-forecast snapshot

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{Coordinates, Place};
pub use weather::{CurrentConditions, DailyEntry, WeatherSnapshot};
