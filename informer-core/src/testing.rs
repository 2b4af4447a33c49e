//! In-memory providers for unit tests.

use std::{collections::HashMap, sync::Mutex};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    error::{RateError, WeatherError},
    model::{CurrencyCode, Rate, WeatherReport, WeatherSnapshot},
    provider::{CityTimeProvider, RateProvider},
};

#[derive(Debug, Clone)]
pub(crate) enum Answer {
    Value(i64, u8),
    Outage,
}

/// Answers from a fixed table; dates not in the table have no rate.
#[derive(Debug, Default)]
pub(crate) struct StubRates {
    answers: HashMap<NaiveDate, Answer>,
    calls: Mutex<Vec<NaiveDate>>,
}

impl StubRates {
    pub(crate) fn with(mut self, date: NaiveDate, answer: Answer) -> Self {
        self.answers.insert(date, answer);
        self
    }

    pub(crate) fn calls(&self) -> Vec<NaiveDate> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl RateProvider for StubRates {
    async fn fetch_rate(&self, date: NaiveDate, currency: CurrencyCode) -> Result<Rate, RateError> {
        self.calls.lock().unwrap().push(date);
        match self.answers.get(&date) {
            Some(Answer::Value(units, subunits)) => Ok(Rate::new(date, currency, *units, *subunits, 1)),
            Some(Answer::Outage) => Err(RateError::unavailable(anyhow::anyhow!("rates host down"))),
            None => Err(RateError::NotFoundForDate { date, currency }),
        }
    }
}

/// A single known city with a fixed clock.
#[derive(Debug)]
pub(crate) struct StubCity {
    pub(crate) name: &'static str,
    pub(crate) now: NaiveDateTime,
    pub(crate) down: bool,
}

impl StubCity {
    fn check(&self, city: &str) -> Result<(), WeatherError> {
        if self.down {
            return Err(WeatherError::unavailable(anyhow::anyhow!("weather host down")));
        }
        if !city.eq_ignore_ascii_case(self.name) {
            return Err(WeatherError::InvalidCity(city.to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CityTimeProvider for StubCity {
    async fn validate_city(&self, city: &str) -> Result<String, WeatherError> {
        self.check(city)?;
        Ok(self.name.to_string())
    }

    async fn local_now(&self, city: &str) -> Result<NaiveDateTime, WeatherError> {
        self.check(city)?;
        Ok(self.now)
    }

    async fn three_day_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        self.check(city)?;
        Ok(WeatherReport {
            provider: "stub".to_string(),
            location_name: self.name.to_string(),
            yesterday: None,
            now: WeatherSnapshot {
                temperature_c: 20.0,
                wind_speed_mps: 1.0,
                wind_degree: 0,
                condition: "clear".to_string(),
            },
            tomorrow: None,
        })
    }
}
