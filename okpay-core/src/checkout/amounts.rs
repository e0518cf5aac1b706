use crate::currency::{ExchangeRateSnapshot, convert};
use okpay_sdk::objects::{CurrencyInfo, REFERENCE_CURRENCY};

/// Round to the two fractional digits shown to the user.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A local-currency amount and its settlement counterpart.
///
/// Editing either side recomputes the other through the snapshot. `None`
/// means the side is empty or could not be converted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmountPair {
    local: Option<f64>,
    currency: &'static CurrencyInfo,
    settlement: Option<f64>,
}

impl AmountPair {
    pub fn new(currency: &'static CurrencyInfo) -> Self {
        Self {
            local: None,
            currency,
            settlement: None,
        }
    }

    pub fn local(&self) -> Option<f64> {
        self.local
    }

    pub fn currency(&self) -> &'static CurrencyInfo {
        self.currency
    }

    pub fn settlement(&self) -> Option<f64> {
        self.settlement
    }

    /// Set the local side and derive the settlement side.
    ///
    /// In the reference currency the two sides are the same number. Otherwise
    /// the derived settlement amount is rounded to cents.
    pub fn set_local(&mut self, amount: Option<f64>, snapshot: Option<&ExchangeRateSnapshot>) {
        self.local = amount;
        self.settlement = amount.and_then(|amount| {
            if self.currency.is_reference() {
                return Some(amount);
            }
            convert(amount, self.currency.code, REFERENCE_CURRENCY, snapshot).map(round_cents)
        });
    }

    /// Set the settlement side and derive the local side, rounded to cents.
    pub fn set_settlement(&mut self, amount: Option<f64>, snapshot: Option<&ExchangeRateSnapshot>) {
        self.settlement = amount;
        self.local = amount.and_then(|amount| {
            if self.currency.is_reference() {
                return Some(amount);
            }
            convert(amount, REFERENCE_CURRENCY, self.currency.code, snapshot).map(round_cents)
        });
    }

    /// Switch the local currency, keeping the local amount and recomputing
    /// the settlement side.
    pub fn set_currency(
        &mut self,
        currency: &'static CurrencyInfo,
        snapshot: Option<&ExchangeRateSnapshot>,
    ) {
        self.currency = currency;
        self.set_local(self.local, snapshot);
    }
}
