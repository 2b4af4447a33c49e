//! Error taxonomy shared by providers and the [`Informer`](crate::Informer) facade.

use chrono::NaiveDate;

use crate::model::CurrencyCode;

/// Boxed cause carried by "provider unavailable" variants.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of the weather/time provider.
///
/// Returned as-is by the facade's time and weather operations.
#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    /// The provider does not know the city.
    #[error("City '{0}' was not found by the weather provider")]
    InvalidCity(String),

    /// Transport or service-level failure.
    #[error("Weather provider is unavailable")]
    Unavailable(#[source] BoxError),
}

impl WeatherError {
    pub(crate) fn unavailable(err: anyhow::Error) -> Self {
        WeatherError::Unavailable(err.into())
    }
}

/// Failures of the currency-rate provider.
#[derive(Debug, thiserror::Error)]
pub enum RateError {
    /// No rate is published for this exact date. Recoverable, per day.
    #[error("No {currency} rate published for {date}")]
    NotFoundForDate { date: NaiveDate, currency: CurrencyCode },

    /// Transport or service-level failure.
    #[error("Currency provider is unavailable")]
    Unavailable(#[source] BoxError),
}

impl RateError {
    pub(crate) fn unavailable(err: anyhow::Error) -> Self {
        RateError::Unavailable(err.into())
    }
}

/// Failure of a facade currency operation.
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    /// "Today" in the city's calendar could not be determined.
    #[error("Currency request failed: could not determine the local date in the city")]
    AnchorDate(#[source] WeatherError),

    /// The currency provider itself failed.
    #[error("Currency request failed: currency provider is unavailable")]
    ProviderUnavailable(#[source] BoxError),
}
