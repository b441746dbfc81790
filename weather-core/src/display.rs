//! Pure presentation helpers: unit conversion, classification and card text.

use crate::model::{Classification, Unit, WeatherRecord};

const RAIN_HUMIDITY: f64 = 80.0;
const HOT_TEMPERATURE: f64 = 15.0;

/// Convert a Celsius value into the display unit. No rounding.
pub fn convert(celsius: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Celsius => celsius,
        Unit::Fahrenheit => celsius * 1.8 + 32.0,
    }
}

/// Bucket a reading. Humidity wins over temperature; both thresholds are exclusive.
pub fn classify(temp: f64, humidity: f64) -> Classification {
    if humidity > RAIN_HUMIDITY {
        Classification::Rain
    } else if temp > HOT_TEMPERATURE {
        Classification::Hot
    } else {
        Classification::Cold
    }
}

pub fn format_temperature(celsius: f64, unit: Unit) -> String {
    format!("{:.2}°{}", convert(celsius, unit), unit)
}

/// Label of the unit switch: names the unit you would switch *to*.
pub fn toggle_label(unit: Unit) -> String {
    format!("Switch to {}", unit.opposite().name())
}

/// Render the info card for a record in the given unit.
pub fn render_card(record: &WeatherRecord, unit: Unit) -> String {
    let class = classify(record.temp, record.humidity);

    [
        format!("{} {}", record.city, class.icon()),
        format!("[{}]", class.image_url()),
        format!("Temperature = {}", format_temperature(record.temp, unit)),
        format!("Humidity = {}", record.humidity),
        format!("Min Temperature = {}", format_temperature(record.temp_min, unit)),
        format!("Max Temperature = {}", format_temperature(record.temp_max, unit)),
        format!(
            "The weather can be described as {} and feels like {}",
            record.weather,
            format_temperature(record.feels_like, unit),
        ),
    ]
    .join("\n")
}
