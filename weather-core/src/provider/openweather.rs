use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    model::WeatherRecord,
};

use super::{LookupError, WeatherProvider};

/// Client for the OpenWeather "current weather" endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

#[derive(Debug)]
pub struct OpenWeatherBuilder {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl OpenWeatherBuilder {
    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> anyhow::Result<OpenWeatherProvider> {
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to build HTTP client: {e}"))?;

        Ok(OpenWeatherProvider { api_key: self.api_key, base_url: self.base_url, http })
    }
}

impl OpenWeatherProvider {
    pub fn builder(api_key: String) -> OpenWeatherBuilder {
        OpenWeatherBuilder {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    #[instrument(skip(self), fields(base_url = %self.base_url))]
    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        let url = format!("{}/weather", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("q", city), ("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await
            .map_err(|e| LookupError::Network(e.to_string()))?;

        let status = res.status();
        let body = res.text().await.map_err(|e| LookupError::Network(e.to_string()))?;

        debug!(%status, bytes = body.len(), "OpenWeather responded");

        if !status.is_success() {
            return Err(LookupError::Status { status: status.as_u16(), body: truncate_body(&body) });
        }

        parse_current(city, &body)
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    temp_min: f64,
    temp_max: f64,
    feels_like: f64,
    humidity: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    main: OwMain,
    weather: Vec<OwWeather>,
}

/// Map a current-weather body into a record named after the caller's input.
fn parse_current(city: &str, body: &str) -> Result<WeatherRecord, LookupError> {
    let parsed: OwCurrentResponse =
        serde_json::from_str(body).map_err(|e| LookupError::Malformed(e.to_string()))?;

    let weather = parsed
        .weather
        .into_iter()
        .next()
        .map(|w| w.description)
        .ok_or_else(|| LookupError::Malformed("empty `weather` array".to_string()))?;

    let record = WeatherRecord {
        city: city.to_string(),
        temp: parsed.main.temp,
        temp_min: parsed.main.temp_min,
        temp_max: parsed.main.temp_max,
        feels_like: parsed.main.feels_like,
        humidity: parsed.main.humidity,
        weather,
    };

    record.validate().map_err(|e| LookupError::Malformed(e.to_string()))?;

    Ok(record)
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        if city.trim().is_empty() {
            return Err(LookupError::EmptyCity);
        }

        self.fetch_current(city).await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARIS: &str = r#"{
        "name": "Paris",
        "main": {"temp": 10.0, "temp_min": 8.5, "temp_max": 11.2, "feels_like": 9.1, "humidity": 71},
        "weather": [{"id": 803, "main": "Clouds", "description": "broken clouds"}]
    }"#;

    #[test]
    fn maps_fields_and_keeps_caller_city() {
        let record = parse_current("paris", PARIS).unwrap();

        assert_eq!(record.city, "paris");
        assert_eq!(record.temp, 10.0);
        assert_eq!(record.temp_min, 8.5);
        assert_eq!(record.temp_max, 11.2);
        assert_eq!(record.feels_like, 9.1);
        assert_eq!(record.humidity, 71.0);
        assert_eq!(record.weather, "broken clouds");
    }

    #[test]
    fn missing_main_is_malformed() {
        let err = parse_current("x", r#"{"weather": [{"description": "rain"}]}"#).unwrap_err();
        assert!(matches!(err, LookupError::Malformed(_)));
    }

    #[test]
    fn empty_weather_array_is_malformed() {
        let body = r#"{"main": {"temp": 1, "temp_min": 1, "temp_max": 1, "feels_like": 1, "humidity": 1}, "weather": []}"#;
        let err = parse_current("x", body).unwrap_err();
        assert!(err.to_string().contains("empty `weather` array"));
    }

    #[tokio::test]
    async fn blank_city_fails_without_request() {
        let provider = OpenWeatherProvider::builder("KEY".into())
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap();

        let err = provider.lookup("  ").await.unwrap_err();
        assert!(matches!(err, LookupError::EmptyCity));
    }

    #[test]
    fn truncate_body_caps_length() {
        let long = "x".repeat(500);
        assert_eq!(truncate_body(&long).len(), 203);
        assert_eq!(truncate_body("short"), "short");
    }
}
