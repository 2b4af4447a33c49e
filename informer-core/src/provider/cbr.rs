use std::collections::HashMap;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, NaiveDate};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::{
    error::RateError,
    model::{CurrencyCode, Rate},
    provider::truncate_body,
};

use super::RateProvider;

const DEFAULT_BASE_URL: &str = "https://www.cbr-xml-daily.ru";

/// Official Central Bank of Russia ruble rates, one sheet per date.
#[derive(Debug, Clone)]
pub struct CbrRateProvider {
    base_url: String,
    http: Client,
}

impl Default for CbrRateProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CbrRateProvider {
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            http: Client::new(),
        }
    }

    /// Point the provider at another host (a mirror or a mock server).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// The daily sheet for `date`, or `None` if the bank set no rates that day.
    async fn fetch_sheet(&self, date: NaiveDate) -> Result<Option<CbrDaily>> {
        let url = format!("{}/archive/{}/daily_json.js", self.base_url, date.format("%Y/%m/%d"));

        let res = self
            .http
            .get(&url)
            .send()
            .await
            .context("Failed to send request to the CBR rates archive")?;

        let status = res.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body = res
            .text()
            .await
            .context("Failed to read CBR rates response body")?;

        if !status.is_success() {
            return Err(anyhow!(
                "CBR rates request failed with status {}: {}",
                status,
                truncate_body(&body),
            ));
        }

        let parsed: CbrDaily =
            serde_json::from_str(&body).context("Failed to parse CBR daily rates JSON")?;

        Ok(Some(parsed))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CbrValute {
    nominal: u32,
    value: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CbrDaily {
    date: DateTime<FixedOffset>,
    valute: HashMap<String, CbrValute>,
}

#[async_trait]
impl RateProvider for CbrRateProvider {
    async fn fetch_rate(&self, date: NaiveDate, currency: CurrencyCode) -> Result<Rate, RateError> {
        let not_found = || RateError::NotFoundForDate { date, currency };

        let sheet = self
            .fetch_sheet(date)
            .await
            .map_err(RateError::unavailable)?
            .ok_or_else(not_found)?;

        // The sheet date is in Moscow time, which is the bank's calendar.
        if sheet.date.date_naive() != date {
            return Err(not_found());
        }

        let valute = sheet.valute.get(currency.as_str()).ok_or_else(not_found)?;

        Ok(Rate::from_value(date, currency, valute.value, valute.nominal))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SHEET: &str = r#"{
        "Date": "2024-01-12T11:30:00+03:00",
        "PreviousDate": "2024-01-11T11:30:00+03:00",
        "Timestamp": "2024-01-11T17:00:00+03:00",
        "Valute": {
            "EUR": {"ID": "R01239", "NumCode": "978", "CharCode": "EUR", "Nominal": 1, "Name": "Евро", "Value": 97.0795, "Previous": 96.8},
            "JPY": {"ID": "R01820", "NumCode": "392", "CharCode": "JPY", "Nominal": 100, "Name": "Японских иен", "Value": 60.9061, "Previous": 61.0}
        }
    }"#;

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    async fn provider_with(status: u16, body: &str, at: &str) -> (MockServer, CbrRateProvider) {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(at))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&server)
            .await;
        let provider = CbrRateProvider::new().with_base_url(server.uri());
        (server, provider)
    }

    #[tokio::test]
    async fn parses_rate_for_requested_date() {
        let (_server, provider) =
            provider_with(200, SHEET, "/archive/2024/01/12/daily_json.js").await;

        let rate = provider.fetch_rate(jan(12), CurrencyCode::Eur).await.unwrap();
        assert_eq!(rate, Rate::new(jan(12), CurrencyCode::Eur, 97, 8, 1));

        let rate = provider.fetch_rate(jan(12), CurrencyCode::Jpy).await.unwrap();
        assert_eq!((rate.units(), rate.subunits(), rate.per_amount()), (60, 91, 100));
    }

    #[tokio::test]
    async fn missing_sheet_is_not_found() {
        let (_server, provider) =
            provider_with(404, "Not found", "/archive/2024/01/13/daily_json.js").await;

        let err = provider.fetch_rate(jan(13), CurrencyCode::Eur).await.unwrap_err();
        assert!(matches!(err, RateError::NotFoundForDate { date, .. } if date == jan(13)));
    }

    #[tokio::test]
    async fn currency_absent_from_sheet_is_not_found() {
        let (_server, provider) =
            provider_with(200, SHEET, "/archive/2024/01/12/daily_json.js").await;

        let err = provider.fetch_rate(jan(12), CurrencyCode::Chf).await.unwrap_err();
        assert!(matches!(err, RateError::NotFoundForDate { currency: CurrencyCode::Chf, .. }));
    }

    #[tokio::test]
    async fn sheet_for_another_date_is_not_found() {
        let (_server, provider) =
            provider_with(200, SHEET, "/archive/2024/01/14/daily_json.js").await;

        let err = provider.fetch_rate(jan(14), CurrencyCode::Eur).await.unwrap_err();
        assert!(matches!(err, RateError::NotFoundForDate { .. }));
    }

    #[tokio::test]
    async fn server_error_is_unavailable() {
        let (_server, provider) =
            provider_with(503, "maintenance", "/archive/2024/01/12/daily_json.js").await;

        let err = provider.fetch_rate(jan(12), CurrencyCode::Eur).await.unwrap_err();
        assert!(matches!(err, RateError::Unavailable(_)));
    }

    #[tokio::test]
    async fn malformed_json_is_unavailable() {
        let (_server, provider) =
            provider_with(200, "<html>", "/archive/2024/01/12/daily_json.js").await;

        let err = provider.fetch_rate(jan(12), CurrencyCode::Eur).await.unwrap_err();
        assert!(matches!(err, RateError::Unavailable(_)));
    }

    #[tokio::test]
    async fn unreachable_host_is_unavailable() {
        let provider = CbrRateProvider::new().with_base_url("http://127.0.0.1:1");

        let err = provider.fetch_rate(jan(12), CurrencyCode::Eur).await.unwrap_err();
        assert!(matches!(err, RateError::Unavailable(_)));
    }
}
