//! Core library for the `informer` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - Weather/time and currency-rate provider abstractions with HTTP implementations
//! - The three-day currency report and maximum-rate selection
//! - The [`Informer`] facade tying one city and one currency together
//!
//! It is used by `informer-cli`, but can also be reused by other binaries or services.

pub mod aggregator;
pub mod config;
pub mod error;
pub mod informer;
pub mod max_rate;
pub mod model;
pub mod provider;

#[cfg(test)]
mod testing;

pub use aggregator::RateAggregator;
pub use config::{Config, ProviderConfig};
pub use error::{CurrencyError, RateError, WeatherError};
pub use informer::Informer;
pub use max_rate::{MaxRate, MaxRateSelector};
pub use model::{CurrencyCode, Day, FetchOutcome, Rate, ThreeDayWindow, WeatherReport};
pub use provider::{CityTimeProvider, ProviderId, RateProvider};
