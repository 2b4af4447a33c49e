use std::{cmp::Ordering, convert::TryFrom, fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Currencies whose ruble rate can be tracked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Usd,
    Eur,
    Gbp,
    Cny,
    Jpy,
    Chf,
}

impl CurrencyCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Usd => "USD",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Chf => "CHF",
        }
    }

    pub const fn all() -> &'static [CurrencyCode] {
        &[
            CurrencyCode::Usd,
            CurrencyCode::Eur,
            CurrencyCode::Gbp,
            CurrencyCode::Cny,
            CurrencyCode::Jpy,
            CurrencyCode::Chf,
        ]
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CurrencyCode {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let upper = value.trim().to_uppercase();

        CurrencyCode::all()
            .iter()
            .copied()
            .find(|code| code.as_str() == upper)
            .ok_or_else(|| {
                let supported: Vec<&str> = CurrencyCode::all().iter().map(|c| c.as_str()).collect();
                anyhow::anyhow!(
                    "Unknown currency '{value}'. Supported currencies: {}.",
                    supported.join(", ")
                )
            })
    }
}

impl FromStr for CurrencyCode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::try_from(s)
    }
}

/// Ruble price of a currency on one calendar date.
///
/// Quoted as `units` rubles and `subunits` kopecks per `per_amount` units of
/// the foreign currency (the central bank quotes e.g. JPY per 100 yen).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rate {
    date: NaiveDate,
    currency: CurrencyCode,
    units: i64,
    /// Always in `0..100`.
    subunits: u8,
    per_amount: u32,
}

impl Rate {
    pub fn new(
        date: NaiveDate,
        currency: CurrencyCode,
        units: i64,
        subunits: u8,
        per_amount: u32,
    ) -> Self {
        // Whole rubles hidden in the kopeck part are carried over.
        Self {
            date,
            currency,
            units: units + i64::from(subunits / 100),
            subunits: subunits % 100,
            per_amount,
        }
    }

    /// Build a rate from a decimal ruble value, rounded to whole kopecks.
    pub fn from_value(date: NaiveDate, currency: CurrencyCode, value: f64, per_amount: u32) -> Self {
        let total = (value * 100.0).round() as i64;
        Self {
            date,
            currency,
            units: total.div_euclid(100),
            subunits: total.rem_euclid(100) as u8,
            per_amount,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn currency(&self) -> CurrencyCode {
        self.currency
    }

    pub fn units(&self) -> i64 {
        self.units
    }

    pub fn subunits(&self) -> u8 {
        self.subunits
    }

    pub fn per_amount(&self) -> u32 {
        self.per_amount
    }

    /// Total value in kopecks.
    pub fn total_subunits(&self) -> i64 {
        self.units * 100 + i64::from(self.subunits)
    }

    /// Orders by monetary value; equal values are broken by date, later is greater.
    pub fn cmp_by_value(&self, other: &Rate) -> Ordering {
        self.total_subunits()
            .cmp(&other.total_subunits())
            .then_with(|| self.date.cmp(&other.date))
    }

    pub fn to_human_readable(&self) -> String {
        format!(
            "{} rub {:02} kop per {} units",
            self.units, self.subunits, self.per_amount
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn currency_code_roundtrip() {
        for code in CurrencyCode::all() {
            let parsed = CurrencyCode::try_from(code.as_str()).expect("roundtrip should succeed");
            assert_eq!(*code, parsed);
        }
    }

    #[test]
    fn currency_code_is_case_insensitive() {
        assert_eq!("eur".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert_eq!(" Usd ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
    }

    #[test]
    fn unknown_currency_lists_supported() {
        let err = CurrencyCode::try_from("XXX").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unknown currency 'XXX'"));
        assert!(msg.contains("EUR"));
    }

    #[test]
    fn from_value_rounds_to_kopecks() {
        let rate = Rate::from_value(date(1), CurrencyCode::Eur, 98.4567, 1);
        assert_eq!((rate.units(), rate.subunits()), (98, 46));

        let rate = Rate::from_value(date(1), CurrencyCode::Jpy, 61.999, 100);
        assert_eq!((rate.units(), rate.subunits()), (62, 0));
        assert_eq!(rate.per_amount(), 100);
    }

    #[test]
    fn new_carries_excess_kopecks() {
        let rate = Rate::new(date(1), CurrencyCode::Eur, 70, 250, 1);
        assert_eq!((rate.units(), rate.subunits()), (72, 50));
        assert_eq!(rate, Rate::new(date(1), CurrencyCode::Eur, 72, 50, 1));
        assert_eq!(rate.to_human_readable(), "72 rub 50 kop per 1 units");
    }

    #[test]
    fn human_readable_pads_kopecks() {
        let rate = Rate::new(date(1), CurrencyCode::Eur, 70, 5, 1);
        assert_eq!(rate.to_human_readable(), "70 rub 05 kop per 1 units");
    }

    #[test]
    fn compares_by_value_before_date() {
        let cheap_late = Rate::new(date(3), CurrencyCode::Eur, 70, 0, 1);
        let dear_early = Rate::new(date(1), CurrencyCode::Eur, 70, 1, 1);
        assert_eq!(dear_early.cmp_by_value(&cheap_late), Ordering::Greater);
    }

    #[test]
    fn equal_values_prefer_later_date() {
        let earlier = Rate::new(date(1), CurrencyCode::Eur, 70, 50, 1);
        let later = Rate::new(date(2), CurrencyCode::Eur, 70, 50, 1);
        assert_eq!(later.cmp_by_value(&earlier), Ordering::Greater);
        assert_eq!(earlier.cmp_by_value(&later), Ordering::Less);
        assert_eq!(earlier.cmp_by_value(&earlier.clone()), Ordering::Equal);
    }

    #[test]
    fn per_amount_does_not_affect_ordering() {
        let per_one = Rate::new(date(1), CurrencyCode::Eur, 10, 0, 1);
        let per_hundred = Rate::new(date(1), CurrencyCode::Eur, 10, 0, 100);
        assert_eq!(per_one.cmp_by_value(&per_hundred), Ordering::Equal);
    }
}
