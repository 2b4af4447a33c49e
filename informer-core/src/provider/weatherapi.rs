use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, NaiveDate, NaiveDateTime, Timelike};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::{
    error::WeatherError,
    model::{WeatherReport, WeatherSnapshot},
    provider::truncate_body,
};

use super::CityTimeProvider;

const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";

/// WeatherAPI error code for "No matching location found".
const NO_MATCHING_LOCATION: u32 = 1006;

const LOCALTIME_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Clone)]
pub struct WeatherApiProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl WeatherApiProvider {
    pub fn new(api_key: String) -> Self {
        Self { api_key, base_url: DEFAULT_BASE_URL.to_string(), http: Client::new() }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(
        &self,
        endpoint: &str,
        city: &str,
        extra: &[(&str, String)],
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("q", city)])
            .query(extra)
            .send()
            .await
            .with_context(|| format!("Failed to send request to WeatherAPI.com ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read WeatherAPI {endpoint} response body"))?;

        Ok((status, body))
    }

    /// GET an endpoint and decode it, telling unknown cities apart from outages.
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        city: &str,
        extra: &[(&str, String)],
    ) -> Result<T, WeatherError> {
        let (status, body) =
            self.send(endpoint, city, extra).await.map_err(WeatherError::unavailable)?;

        if !status.is_success() {
            let code = serde_json::from_str::<WaErrorResponse>(&body).ok().map(|e| e.error.code);
            if code == Some(NO_MATCHING_LOCATION) {
                return Err(WeatherError::InvalidCity(city.to_string()));
            }
            return Err(WeatherError::unavailable(anyhow!(
                "WeatherAPI {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse WeatherAPI {endpoint} JSON"))
            .map_err(WeatherError::unavailable)
    }

    async fn fetch_current(&self, city: &str) -> Result<WaResponse, WeatherError> {
        self.get_json("current.json", city, &[]).await
    }
}

#[derive(Debug, Deserialize)]
struct WaErrorBody {
    code: u32,
}

#[derive(Debug, Deserialize)]
struct WaErrorResponse {
    error: WaErrorBody,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    name: String,
    country: String,
    localtime: String,
}

impl WaLocation {
    fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.country)
    }

    fn local_now(&self) -> Result<NaiveDateTime, WeatherError> {
        NaiveDateTime::parse_from_str(&self.localtime, LOCALTIME_FORMAT)
            .with_context(|| format!("Unexpected WeatherAPI localtime '{}'", self.localtime))
            .map_err(WeatherError::unavailable)
    }
}

#[derive(Debug, Deserialize)]
struct WaCondition {
    text: String,
}

#[derive(Debug, Deserialize)]
struct WaCurrent {
    temp_c: f64,
    wind_kph: f64,
    wind_degree: u16,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaResponse {
    location: WaLocation,
    current: WaCurrent,
}

#[derive(Debug, Deserialize)]
struct WaForecastHour {
    time: String,
    temp_c: f64,
    wind_kph: f64,
    wind_degree: u16,
    condition: WaCondition,
}

#[derive(Debug, Deserialize)]
struct WaForecastDay {
    date: NaiveDate,
    hour: Vec<WaForecastHour>,
}

#[derive(Debug, Deserialize)]
struct WaForecast {
    forecastday: Vec<WaForecastDay>,
}

#[derive(Debug, Deserialize)]
struct WaForecastResponse {
    forecast: WaForecast,
}

impl WaForecastResponse {
    /// The entry for `date` at `hour`, or the first one that day.
    fn snapshot_at(&self, date: NaiveDate, hour: u32) -> Option<WeatherSnapshot> {
        let day = self.forecast.forecastday.iter().find(|d| d.date == date)?;
        let entry = day
            .hour
            .iter()
            .find(|h| {
                NaiveDateTime::parse_from_str(&h.time, LOCALTIME_FORMAT)
                    .is_ok_and(|t| t.hour() == hour)
            })
            .or_else(|| day.hour.first())?;

        Some(WeatherSnapshot {
            temperature_c: entry.temp_c,
            wind_speed_mps: entry.wind_kph / 3.6,
            wind_degree: entry.wind_degree,
            condition: entry.condition.text.clone(),
        })
    }
}

#[async_trait]
impl CityTimeProvider for WeatherApiProvider {
    async fn validate_city(&self, city: &str) -> Result<String, WeatherError> {
        let parsed = self.fetch_current(city).await?;
        Ok(parsed.location.display_name())
    }

    async fn local_now(&self, city: &str) -> Result<NaiveDateTime, WeatherError> {
        self.fetch_current(city).await?.location.local_now()
    }

    async fn three_day_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let current = self.fetch_current(city).await?;
        let local_now = current.location.local_now()?;
        let hour = local_now.hour();
        let yesterday = local_now.date() - Duration::days(1);
        let tomorrow = local_now.date() + Duration::days(1);

        debug!(%city, %yesterday, hour, "requesting WeatherAPI history");
        // Plans without history access are refused; yesterday then has no data.
        let history: Option<WaForecastResponse> = match self
            .get_json(
                "history.json",
                city,
                &[("dt", yesterday.format("%Y-%m-%d").to_string()), ("hour", hour.to_string())],
            )
            .await
        {
            Ok(history) => Some(history),
            Err(WeatherError::Unavailable(err)) => {
                warn!(%city, %yesterday, error = %err, "WeatherAPI history unavailable");
                None
            }
            Err(err) => return Err(err),
        };

        debug!(%city, %tomorrow, hour, "requesting WeatherAPI forecast");
        let forecast: WaForecastResponse = self
            .get_json(
                "forecast.json",
                city,
                &[("days", "2".to_string()), ("hour", hour.to_string())],
            )
            .await?;

        Ok(WeatherReport {
            provider: "weatherapi".to_string(),
            location_name: current.location.display_name(),
            yesterday: history.and_then(|h| h.snapshot_at(yesterday, hour)),
            now: WeatherSnapshot {
                temperature_c: current.current.temp_c,
                wind_speed_mps: current.current.wind_kph / 3.6,
                wind_degree: current.current.wind_degree,
                condition: current.current.condition.text,
            },
            tomorrow: forecast.snapshot_at(tomorrow, hour),
        })
    }
}
