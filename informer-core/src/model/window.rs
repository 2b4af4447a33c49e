use chrono::{Duration, NaiveDate};

use super::Rate;

/// One of the three days around the anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Day {
    Yesterday,
    Today,
    Tomorrow,
}

impl Day {
    pub fn as_str(&self) -> &'static str {
        match self {
            Day::Yesterday => "yesterday",
            Day::Today => "today",
            Day::Tomorrow => "tomorrow",
        }
    }

    /// Verb in the tense matching the day.
    pub fn verb(&self) -> &'static str {
        match self {
            Day::Yesterday => "was",
            Day::Today => "is",
            Day::Tomorrow => "will be",
        }
    }

    pub fn capitalized(&self) -> &'static str {
        match self {
            Day::Yesterday => "Yesterday",
            Day::Today => "Today",
            Day::Tomorrow => "Tomorrow",
        }
    }
}

/// Yesterday, today and tomorrow relative to an anchor date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeDayWindow {
    pub yesterday: NaiveDate,
    pub today: NaiveDate,
    pub tomorrow: NaiveDate,
}

impl ThreeDayWindow {
    pub fn around(today: NaiveDate) -> Self {
        Self {
            yesterday: today - Duration::days(1),
            today,
            tomorrow: today + Duration::days(1),
        }
    }

    /// Days in fetch and report order.
    pub fn days(&self) -> [(Day, NaiveDate); 3] {
        [
            (Day::Yesterday, self.yesterday),
            (Day::Today, self.today),
            (Day::Tomorrow, self.tomorrow),
        ]
    }

    /// Which day of the window `date` falls on.
    pub fn day_of(&self, date: NaiveDate) -> Option<Day> {
        self.days()
            .into_iter()
            .find_map(|(day, d)| (d == date).then_some(day))
    }
}

/// Result of one per-day rate fetch that did not hard-fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Present(Rate),
    Missing,
}

impl FetchOutcome {
    pub fn rate(&self) -> Option<&Rate> {
        match self {
            FetchOutcome::Present(rate) => Some(rate),
            FetchOutcome::Missing => None,
        }
    }
}
