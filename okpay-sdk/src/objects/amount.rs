use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Asset symbol of the settlement currency.
pub const SETTLEMENT_ASSET: &str = "HBD";

/// Hive assets carry three fractional digits on chain.
pub const SETTLEMENT_PRECISION: u32 = 3;

/// An amount of the settlement asset, always held at exactly three
/// fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct HbdAmount(Decimal);

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("amount is not a finite number")]
    NotFinite,
    #[error("amount must be greater than zero")]
    NotPositive,
}

impl HbdAmount {
    /// Build a positive amount from a decimal, rounding half away from zero
    /// to three fractional digits.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let mut value =
            value.round_dp_with_strategy(SETTLEMENT_PRECISION, RoundingStrategy::MidpointAwayFromZero);
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive);
        }
        value.rescale(SETTLEMENT_PRECISION);
        Ok(Self(value))
    }

    /// Build an amount from a float entered or computed by the caller.
    pub fn from_f64(value: f64) -> Result<Self, AmountError> {
        if !value.is_finite() {
            return Err(AmountError::NotFinite);
        }
        if value <= 0.0 {
            return Err(AmountError::NotPositive);
        }
        let value = Decimal::try_from(value).map_err(|_| AmountError::NotFinite)?;
        Self::new(value)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// The bare number, e.g. `10.000`.
    pub fn number(&self) -> String {
        self.0.to_string()
    }

    /// The number with the asset suffix, e.g. `10.000 HBD`.
    pub fn with_asset(&self) -> String {
        format!("{} {SETTLEMENT_ASSET}", self.0)
    }
}

impl TryFrom<Decimal> for HbdAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl std::fmt::Display for HbdAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {SETTLEMENT_ASSET}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_fractional_digits() {
        assert_eq!(HbdAmount::from_f64(10.0).unwrap().number(), "10.000");
        assert_eq!(HbdAmount::from_f64(1.11).unwrap().number(), "1.110");
        assert_eq!(HbdAmount::from_f64(0.0005).unwrap().number(), "0.001");
        assert_eq!(HbdAmount::from_f64(2.34567).unwrap().number(), "2.346");
        assert_eq!(HbdAmount::from_f64(10.0).unwrap().with_asset(), "10.000 HBD");
    }

    #[test]
    fn test_rejects_non_positive_and_non_finite() {
        assert_eq!(HbdAmount::from_f64(0.0), Err(AmountError::NotPositive));
        assert_eq!(HbdAmount::from_f64(-3.0), Err(AmountError::NotPositive));
        assert_eq!(HbdAmount::from_f64(f64::NAN), Err(AmountError::NotFinite));
        assert_eq!(HbdAmount::from_f64(f64::INFINITY), Err(AmountError::NotFinite));
        // Rounds to zero at three digits.
        assert_eq!(HbdAmount::from_f64(0.0004), Err(AmountError::NotPositive));
    }

    #[test]
    fn test_deserialize_applies_amount_rules() {
        let amount: HbdAmount = serde_json::from_str(r#""1.5""#).unwrap();
        assert_eq!(amount.number(), "1.500");
        assert_eq!(serde_json::to_string(&amount).unwrap(), r#""1.500""#);
        for raw in [r#""0""#, r#""-2.000""#, r#""0.0004""#] {
            assert!(serde_json::from_str::<HbdAmount>(raw).is_err(), "{raw}");
        }
    }
}
