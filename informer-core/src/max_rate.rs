//! Which of yesterday, today and tomorrow had the highest rate.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::{
    aggregator::RateAggregator,
    error::CurrencyError,
    model::{CurrencyCode, Day, FetchOutcome, Rate, ThreeDayWindow},
    provider::RateProvider,
};

/// Outcome of maximum selection over a three-day window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaxRate<'a> {
    /// No day has data.
    Unknown,
    /// Exactly one day has data; nothing was compared.
    OnlyKnown(Day, &'a Rate),
    /// Two or three days had data; this one is the highest.
    Maximum(Day, &'a Rate),
}

/// Picks the highest present rate; equal values go to the later day.
///
/// The winner's day is read back from its date, so a rate dated outside
/// `window` never enters the working set.
pub fn select_max<'a>(window: &ThreeDayWindow, outcomes: &'a [(Day, FetchOutcome)]) -> MaxRate<'a> {
    let mut working_set: Vec<&Rate> = outcomes
        .iter()
        .filter_map(|(_, outcome)| outcome.rate())
        .filter(|rate| window.day_of(rate.date()).is_some())
        .collect();
    working_set.sort_by(|a, b| a.cmp_by_value(b));

    let Some(&best) = working_set.last() else {
        return MaxRate::Unknown;
    };
    let Some(day) = window.day_of(best.date()) else {
        return MaxRate::Unknown;
    };

    if working_set.len() == 1 {
        MaxRate::OnlyKnown(day, best)
    } else {
        MaxRate::Maximum(day, best)
    }
}

pub fn describe(currency: CurrencyCode, max: &MaxRate<'_>) -> String {
    match max {
        MaxRate::Unknown => {
            format!("The {currency} rate is unknown for yesterday, today and tomorrow.")
        }
        MaxRate::OnlyKnown(day, rate) => format!(
            "The {currency} rate for yesterday, today and tomorrow is known only for {}: it {} {}",
            day.as_str(),
            day.verb(),
            rate.to_human_readable()
        ),
        MaxRate::Maximum(day, rate) => format!(
            "The maximum {currency} rate occurs {}: it {} {}",
            day.as_str(),
            day.verb(),
            rate.to_human_readable()
        ),
    }
}

/// Runs the three-day fetch and phrases where the maximum fell.
#[derive(Debug)]
pub struct MaxRateSelector<'a, P: ?Sized> {
    aggregator: RateAggregator<'a, P>,
}

impl<'a, P: RateProvider + ?Sized> MaxRateSelector<'a, P> {
    pub fn new(provider: &'a P, currency: CurrencyCode) -> Self {
        Self { aggregator: RateAggregator::new(provider, currency) }
    }

    pub async fn max_rate_info(&self, today: NaiveDate) -> Result<String, CurrencyError> {
        let currency = self.aggregator.currency();
        let window = ThreeDayWindow::around(today);
        let outcomes = self.aggregator.fetch_window(&window).await?;
        let max = select_max(&window, &outcomes);

        match &max {
            MaxRate::Unknown => warn!(%currency, %today, "no rate known for any of the three days"),
            MaxRate::OnlyKnown(day, _) | MaxRate::Maximum(day, _) => {
                debug!(%currency, day = day.as_str(), "highest rate found")
            }
        }

        Ok(describe(currency, &max))
    }
}
