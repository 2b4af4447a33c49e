use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};

use crate::{
    error::WeatherError,
    model::{WeatherReport, WeatherSnapshot},
    provider::truncate_body,
};

use super::CityTimeProvider;

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send(&self, endpoint: &str, city: &str) -> Result<(StatusCode, String)> {
        let url = format!("{}/{endpoint}", self.base_url);

        let res = self
            .http
            .get(&url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({endpoint})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {endpoint} response body"))?;

        Ok((status, body))
    }

    async fn get_json<T: DeserializeOwned>(&self, endpoint: &str, city: &str) -> Result<T, WeatherError> {
        let (status, body) = self.send(endpoint, city).await.map_err(WeatherError::unavailable)?;

        if status == StatusCode::NOT_FOUND {
            return Err(WeatherError::InvalidCity(city.to_string()));
        }

        if !status.is_success() {
            return Err(WeatherError::unavailable(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                endpoint,
                status,
                truncate_body(&body),
            )));
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse OpenWeather {endpoint} JSON"))
            .map_err(WeatherError::unavailable)
    }

    async fn fetch_current(&self, city: &str) -> Result<OwCurrentResponse, WeatherError> {
        self.get_json("weather", city).await
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
    #[serde(default)]
    deg: u16,
}

#[derive(Debug, Deserialize)]
struct OwSys {
    country: String,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    /// Shift from UTC in seconds.
    timezone: i64,
    sys: OwSys,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

fn snapshot(main: &OwMain, weather: &[OwWeather], wind: &OwWind) -> WeatherSnapshot {
    let condition = weather
        .first()
        .map(|w| w.description.clone())
        .unwrap_or_else(|| "Unknown".to_string());

    WeatherSnapshot {
        temperature_c: main.temp,
        wind_speed_mps: wind.speed,
        wind_degree: wind.deg,
        condition,
    }
}

impl OwCurrentResponse {
    fn display_name(&self) -> String {
        format!("{}, {}", self.name, self.sys.country)
    }
}

#[async_trait]
impl CityTimeProvider for OpenWeatherProvider {
    async fn validate_city(&self, city: &str) -> Result<String, WeatherError> {
        Ok(self.fetch_current(city).await?.display_name())
    }

    async fn local_now(&self, city: &str) -> Result<NaiveDateTime, WeatherError> {
        let current = self.fetch_current(city).await?;
        Ok(Utc::now().naive_utc() + Duration::seconds(current.timezone))
    }

    /// The free API has no history, so yesterday is always reported as missing.
    async fn three_day_weather(&self, city: &str) -> Result<WeatherReport, WeatherError> {
        let current = self.fetch_current(city).await?;
        let forecast: OwForecastResponse = self.get_json("forecast", city).await?;

        let target_ts = (Utc::now() + Duration::days(1)).timestamp();
        let tomorrow = forecast
            .list
            .iter()
            .min_by_key(|e| (e.dt - target_ts).abs())
            .map(|e| snapshot(&e.main, &e.weather, &e.wind));

        Ok(WeatherReport {
            provider: "openweather".to_string(),
            location_name: current.display_name(),
            yesterday: None,
            now: snapshot(&current.main, &current.weather, &current.wind),
            tomorrow,
        })
    }
}
