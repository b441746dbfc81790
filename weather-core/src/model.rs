use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A single normalized weather observation.
///
/// Temperatures are always Celsius; the display unit never touches the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city: String,
    pub temp: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub feels_like: f64,
    pub humidity: f64,
    pub weather: String,
}

/// Reason a record failed structural validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InvalidRecord {
    #[error("city name is empty")]
    EmptyCity,

    #[error("field `{0}` is not a finite number")]
    NotFinite(&'static str),
}

impl WeatherRecord {
    /// Check that the record is usable for rendering: non-blank city, finite numbers.
    pub fn validate(&self) -> Result<(), InvalidRecord> {
        if self.city.trim().is_empty() {
            return Err(InvalidRecord::EmptyCity);
        }

        let numbers = [
            ("temp", self.temp),
            ("tempMin", self.temp_min),
            ("tempMax", self.temp_max),
            ("feelsLike", self.feels_like),
            ("humidity", self.humidity),
        ];

        for (name, value) in numbers {
            if !value.is_finite() {
                return Err(InvalidRecord::NotFinite(name));
            }
        }

        Ok(())
    }
}

impl Default for WeatherRecord {
    /// Record shown on a fresh start, before anything has been persisted.
    fn default() -> Self {
        Self {
            city: "Delhi".to_string(),
            temp: 32.84,
            temp_min: 32.84,
            temp_max: 33.05,
            feels_like: 39.84,
            humidity: 66.0,
            weather: "haze".to_string(),
        }
    }
}

/// Display temperature scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Celsius => "C",
            Unit::Fahrenheit => "F",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Unit::Celsius => "Celsius",
            Unit::Fahrenheit => "Fahrenheit",
        }
    }

    pub fn opposite(&self) -> Unit {
        match self {
            Unit::Celsius => Unit::Fahrenheit,
            Unit::Fahrenheit => Unit::Celsius,
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for Unit {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "c" | "celsius" => Ok(Unit::Celsius),
            "f" | "fahrenheit" => Ok(Unit::Fahrenheit),
            _ => Err(anyhow::anyhow!(
                "Unknown unit '{value}'. Supported units: c (celsius), f (fahrenheit)."
            )),
        }
    }
}

/// Three-way bucket driving both the icon and the background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Rain,
    Hot,
    Cold,
}

const RAIN_URL: &str = "https://assets.telegraphindia.com/telegraph/2021/Oct/1634469423_weather.jpg";
const HOT_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcSyJMSSZjgxbIXZzCnPwg4nwxVZLPh7l-lrXw&s";
const COLD_URL: &str = "https://encrypted-tbn0.gstatic.com/images?q=tbn:ANd9GcQQKOSJDCrHcEa0yCLxD2aGpnQ0yBmXcAhZrA&s";

impl Classification {
    pub fn icon(&self) -> &'static str {
        match self {
            Classification::Rain => "⛈",
            Classification::Hot => "☀",
            Classification::Cold => "❄",
        }
    }

    pub fn image_url(&self) -> &'static str {
        match self {
            Classification::Rain => RAIN_URL,
            Classification::Hot => HOT_URL,
            Classification::Cold => COLD_URL,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Rain => "rain",
            Classification::Hot => "hot",
            Classification::Cold => "cold",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
