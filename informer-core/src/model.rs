//! Shared domain models: currencies and rates, the three-day window, weather.

pub mod currency;
pub mod weather;
pub mod window;

pub use currency::{CurrencyCode, Rate};
pub use weather::{WeatherReport, WeatherSnapshot};
pub use window::{Day, FetchOutcome, ThreeDayWindow};
