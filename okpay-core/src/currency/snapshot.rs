use okpay_sdk::objects::REFERENCE_CURRENCY;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use time::Date;

/// Exchange rates relative to the reference currency, as fetched on `date`.
///
/// The reference currency itself is implicitly 1.0 whether or not the
/// provider lists it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateSnapshot {
    date: Date,
    rates: BTreeMap<String, f64>,
}

impl ExchangeRateSnapshot {
    pub fn new(date: Date, rates: BTreeMap<String, f64>) -> Self {
        Self { date, rates }
    }

    pub fn date(&self) -> Date {
        self.date
    }

    pub fn rates(&self) -> &BTreeMap<String, f64> {
        &self.rates
    }

    /// Usable rate for `code`. Missing and zero rates are both unusable.
    pub fn rate(&self, code: &str) -> Option<f64> {
        match self.rates.get(code) {
            Some(rate) if *rate != 0.0 && rate.is_finite() => Some(*rate),
            Some(_) => None,
            None if code == REFERENCE_CURRENCY => Some(1.0),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_rate_lookup() {
        let snapshot = ExchangeRateSnapshot::new(
            date!(2026 - 10 - 16),
            BTreeMap::from([("ARS".to_owned(), 900.0), ("XXX".to_owned(), 0.0)]),
        );
        assert_eq!(snapshot.rate("ARS"), Some(900.0));
        assert_eq!(snapshot.rate("USD"), Some(1.0));
        assert_eq!(snapshot.rate("XXX"), None);
        assert_eq!(snapshot.rate("EUR"), None);
    }

    #[test]
    fn test_serialized_form() {
        let snapshot = ExchangeRateSnapshot::new(
            date!(2026 - 10 - 16),
            BTreeMap::from([("EUR".to_owned(), 0.5)]),
        );
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"date": "2026-10-16", "rates": {"EUR": 0.5}})
        );
        let back: ExchangeRateSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back, snapshot);
    }
}
