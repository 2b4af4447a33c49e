//! The [`Informer`] facade: one validated city, one tracked currency.

use chrono::{NaiveDate, NaiveTime, Timelike};
use tracing::error;

use crate::{
    aggregator::RateAggregator,
    error::{CurrencyError, WeatherError},
    max_rate::MaxRateSelector,
    model::CurrencyCode,
    provider::{CityTimeProvider, RateProvider},
};

/// Answers time, weather and currency questions about a single city.
///
/// The city name is validated once at construction and stored in the
/// provider's spelling, which may differ from the one passed in.
#[derive(Debug)]
pub struct Informer {
    city: String,
    currency: CurrencyCode,
    weather: Box<dyn CityTimeProvider>,
    rates: Box<dyn RateProvider>,
}

impl Informer {
    pub async fn new(
        city: &str,
        currency: CurrencyCode,
        weather: Box<dyn CityTimeProvider>,
        rates: Box<dyn RateProvider>,
    ) -> Result<Self, WeatherError> {
        let city = weather.validate_city(city).await?;
        Ok(Self { city, currency, weather, rates })
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// Current time in the city, to the minute.
    pub async fn local_time(&self) -> Result<NaiveTime, WeatherError> {
        let now = self.weather.local_now(&self.city).await?.time();
        Ok(now.with_second(0).and_then(|t| t.with_nanosecond(0)).unwrap_or(now))
    }

    pub async fn three_day_weather(&self) -> Result<String, WeatherError> {
        Ok(self.weather.three_day_weather(&self.city).await?.to_human_readable())
    }

    pub async fn three_day_currency_rate(&self) -> Result<String, CurrencyError> {
        let today = self.local_date().await?;
        RateAggregator::new(&*self.rates, self.currency).three_day_report(today).await
    }

    pub async fn three_day_max_currency_rate_info(&self) -> Result<String, CurrencyError> {
        let today = self.local_date().await?;
        MaxRateSelector::new(&*self.rates, self.currency).max_rate_info(today).await
    }

    /// Today's date in the city's calendar.
    async fn local_date(&self) -> Result<NaiveDate, CurrencyError> {
        match self.weather.local_now(&self.city).await {
            Ok(now) => Ok(now.date()),
            Err(err) => {
                error!(city = %self.city, error = %err, "failed to get the local date from the weather provider");
                Err(CurrencyError::AnchorDate(err))
            }
        }
    }
}
