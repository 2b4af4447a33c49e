use crate::{
    Config,
    error::{RateError, WeatherError},
    model::{CurrencyCode, Rate, WeatherReport},
    provider::{cbr::CbrRateProvider, openweather::OpenWeatherProvider, weatherapi::WeatherApiProvider},
};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::{convert::TryFrom, fmt::Debug};

pub mod cbr;
pub mod openweather;
pub mod weatherapi;

/// Weather/time providers that can be configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderId {
    OpenWeather,
    WeatherApi,
}

impl ProviderId {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::OpenWeather => "openweather",
            ProviderId::WeatherApi => "weatherapi",
        }
    }

    pub const fn all() -> &'static [ProviderId] {
        &[ProviderId::OpenWeather, ProviderId::WeatherApi]
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProviderId {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let lower = value.to_lowercase();

        match lower.as_str() {
            "openweather" => Ok(ProviderId::OpenWeather),
            "weatherapi" => Ok(ProviderId::WeatherApi),
            _ => Err(anyhow::anyhow!(
                "Unknown provider '{value}'. Supported providers: openweather, weatherapi."
            )),
        }
    }
}

/// Resolves cities and answers time and weather questions about them.
#[async_trait]
pub trait CityTimeProvider: Send + Sync + Debug {
    /// Check that the city exists and return the provider's spelling of it.
    async fn validate_city(&self, city: &str) -> Result<String, WeatherError>;

    /// Current local date and time in the city.
    async fn local_now(&self, city: &str) -> Result<NaiveDateTime, WeatherError>;

    async fn three_day_weather(&self, city: &str) -> Result<WeatherReport, WeatherError>;
}

/// Publishes one rate per currency per date.
#[async_trait]
pub trait RateProvider: Send + Sync + Debug {
    /// Rate for exactly `date`; [`RateError::NotFoundForDate`] when none is published.
    async fn fetch_rate(&self, date: NaiveDate, currency: CurrencyCode) -> Result<Rate, RateError>;
}

/// Construct a weather/time provider from config and explicit ProviderId.
pub fn provider_from_config(
    id: ProviderId,
    config: &Config,
) -> anyhow::Result<Box<dyn CityTimeProvider>> {
    let api_key = config.provider_api_key(id).ok_or_else(|| {
        anyhow::anyhow!(
            "No API key configured for provider '{id}'.\n\
                 Hint: run `informer configure {id}` and enter your API key."
        )
    })?;

    let boxed: Box<dyn CityTimeProvider> = match id {
        ProviderId::OpenWeather => Box::new(OpenWeatherProvider::new(api_key.to_owned())),
        ProviderId::WeatherApi => Box::new(WeatherApiProvider::new(api_key.to_owned())),
    };

    Ok(boxed)
}

/// Construct the default weather/time provider from config, using `default_provider` field.
pub fn default_provider_from_config(config: &Config) -> anyhow::Result<Box<dyn CityTimeProvider>> {
    let id = config.default_provider_id()?;
    provider_from_config(id, config)
}

/// Construct the currency-rate provider, honouring a configured base URL.
pub fn rate_provider_from_config(config: &Config) -> Box<dyn RateProvider> {
    let provider = match config.currency_base_url.as_deref() {
        Some(url) => CbrRateProvider::new().with_base_url(url),
        None => CbrRateProvider::new(),
    };
    Box::new(provider)
}

/// Shortens a response body for error messages.
pub(crate) fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
