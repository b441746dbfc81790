use crate::{Config, WeatherRecord, provider::openweather::OpenWeatherProvider};
use async_trait::async_trait;
use std::fmt::Debug;
use thiserror::Error;

pub mod openweather;

/// Why a lookup produced no record.
///
/// Users only ever see [`LookupError::USER_MESSAGE`]; the variants exist for logs and tests.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("City name is empty")]
    EmptyCity,

    #[error("Weather request failed: {0}")]
    Network(String),

    #[error("Weather service answered with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected weather response: {0}")]
    Malformed(String),
}

impl LookupError {
    pub const USER_MESSAGE: &'static str = "No such place exists!";
}

#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Translate a city name into a record with one remote round trip.
    async fn lookup(&self, city: &str) -> Result<WeatherRecord, LookupError>;
}

/// Construct the OpenWeather provider from config.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured.\n\
                 Hint: run `weather configure` and enter your OpenWeather API key."
        )
    })?;

    let provider = OpenWeatherProvider::builder(api_key.to_owned())
        .base_url(config.base_url())
        .timeout(config.timeout())
        .build()?;

    Ok(Box::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();

        let msg = err.to_string();
        assert!(msg.contains("No API key configured"));
        assert!(msg.contains("Hint: run `weather configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn status_error_mentions_code() {
        let err = LookupError::Status { status: 404, body: "city not found".into() };
        assert!(err.to_string().contains("404"));
    }
}
