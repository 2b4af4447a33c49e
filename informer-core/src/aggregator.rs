//! Three-day currency report: yesterday, today and tomorrow around an anchor date.

use chrono::NaiveDate;
use tracing::{debug, info};

use crate::{
    error::{CurrencyError, RateError},
    model::{CurrencyCode, Day, FetchOutcome, ThreeDayWindow},
    provider::RateProvider,
};

/// Fetches rates for a three-day window, tolerating days without data.
#[derive(Debug)]
pub struct RateAggregator<'a, P: ?Sized> {
    provider: &'a P,
    currency: CurrencyCode,
}

impl<'a, P: RateProvider + ?Sized> RateAggregator<'a, P> {
    pub fn new(provider: &'a P, currency: CurrencyCode) -> Self {
        Self { provider, currency }
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    /// One outcome per day, in window order. Fetches run one after another.
    ///
    /// A day without a published rate becomes [`FetchOutcome::Missing`]; the
    /// first provider outage aborts the whole window.
    pub async fn fetch_window(
        &self,
        window: &ThreeDayWindow,
    ) -> Result<Vec<(Day, FetchOutcome)>, CurrencyError> {
        let mut outcomes = Vec::with_capacity(3);
        for (day, date) in window.days() {
            outcomes.push((day, self.fetch_day(day, date).await?));
        }
        Ok(outcomes)
    }

    async fn fetch_day(&self, day: Day, date: NaiveDate) -> Result<FetchOutcome, CurrencyError> {
        debug!(currency = %self.currency, %date, day = day.as_str(), "fetching currency rate");

        match self.provider.fetch_rate(date, self.currency).await {
            Ok(rate) => Ok(FetchOutcome::Present(rate)),
            Err(RateError::NotFoundForDate { .. }) => {
                debug!(currency = %self.currency, %date, "no rate published");
                Ok(FetchOutcome::Missing)
            }
            Err(RateError::Unavailable(source)) => Err(CurrencyError::ProviderUnavailable(source)),
        }
    }

    /// Header line plus one line per day, yesterday first.
    pub async fn three_day_report(&self, today: NaiveDate) -> Result<String, CurrencyError> {
        info!(currency = %self.currency, %today, "three-day currency rate requested");

        let outcomes = self.fetch_window(&ThreeDayWindow::around(today)).await?;
        Ok(render_report(self.currency, &outcomes))
    }
}

pub fn render_report(currency: CurrencyCode, outcomes: &[(Day, FetchOutcome)]) -> String {
    let mut lines = vec![format!("Currency information for {currency}")];

    lines.extend(outcomes.iter().map(|(day, outcome)| match outcome {
        FetchOutcome::Present(rate) => format!(
            "{} the rate {} {}",
            day.capitalized(),
            day.verb(),
            rate.to_human_readable()
        ),
        FetchOutcome::Missing => format!("Rate unavailable for {}", day.as_str()),
    }));

    lines.join("\n")
}
