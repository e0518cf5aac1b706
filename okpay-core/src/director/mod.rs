//! Transfer directive construction and delivery.
//!
//! A [`TransferDirective`] can only be built from a valid account and a
//! positive amount. [`TransferDirector`] hands it to exactly one signing
//! channel per submission.

mod delivery;

pub use delivery::{
    DeliveryChannels, DeliveryOutcome, ExtensionResponse, ExtensionTransferRequest,
    NavigationSignal, Navigator, RaceTarget, SigningExtension, TransferDirector,
};

use crate::account::{InvalidReason, ValidationResult};
use okpay_sdk::links;
use okpay_sdk::objects::amount::AmountError;
use okpay_sdk::objects::{AccountName, HbdAmount, Memo};
use thiserror::Error;
use url::Url;

/// Reasons a directive cannot be built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectiveError {
    #[error("recipient account is not valid ({0:?})")]
    AccountNotValid(InvalidReason),

    #[error("invalid amount: {0}")]
    InvalidAmount(#[from] AmountError),
}

/// A fully specified transfer, ready for a signing channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferDirective {
    to: AccountName,
    amount: HbdAmount,
    memo: Memo,
}

impl TransferDirective {
    /// Build a directive to the account resolved by `account`.
    ///
    /// Fails unless `account` is [`ValidationResult::Valid`] and
    /// `settlement_amount` is finite and positive at three fractional digits.
    pub fn build(
        account: &ValidationResult,
        settlement_amount: f64,
        memo: Memo,
    ) -> Result<Self, DirectiveError> {
        let record = match account {
            ValidationResult::Valid(record) => record,
            ValidationResult::Invalid(reason) => {
                return Err(DirectiveError::AccountNotValid(*reason));
            }
        };
        let to = AccountName::sanitize(&record.name);
        if !to.has_valid_format() {
            return Err(DirectiveError::AccountNotValid(InvalidReason::Format));
        }
        let amount = HbdAmount::from_f64(settlement_amount)?;
        Ok(Self { to, amount, memo })
    }

    pub fn to(&self) -> &AccountName {
        &self.to
    }

    pub fn amount(&self) -> &HbdAmount {
        &self.amount
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    /// Deep link for the native signing agent registered under `scheme`.
    pub fn deep_link(&self, scheme: &str) -> Result<String, serde_json::Error> {
        links::deep_link(scheme, &self.to, &self.amount, &self.memo)
    }

    /// Hosted signer page for this transfer.
    pub fn fallback_url(&self, signer: &Url) -> Url {
        links::fallback_signer_url(signer, &self.to, &self.amount, &self.memo)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::mock::record;

    fn memo() -> Memo {
        Memo::parse("kcs-hpos-0007-4242").unwrap()
    }

    #[test]
    fn test_build_from_valid_account() {
        let directive =
            TransferDirective::build(&ValidationResult::Valid(record("alice")), 10.0, memo())
                .unwrap();
        assert_eq!(directive.to().as_str(), "alice");
        assert_eq!(directive.amount().number(), "10.000");
        assert_eq!(directive.memo(), &memo());
    }

    #[test]
    fn test_invalid_account_is_rejected() {
        for reason in [InvalidReason::Empty, InvalidReason::Format, InvalidReason::NotFound] {
            assert_eq!(
                TransferDirective::build(&ValidationResult::Invalid(reason), 10.0, memo()),
                Err(DirectiveError::AccountNotValid(reason))
            );
        }
    }

    #[test]
    fn test_bad_amounts_are_rejected() {
        let valid = ValidationResult::Valid(record("alice"));
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(
                matches!(
                    TransferDirective::build(&valid, amount, memo()),
                    Err(DirectiveError::InvalidAmount(_))
                ),
                "{amount} should be rejected"
            );
        }
    }

    #[test]
    fn test_channel_links() {
        let directive =
            TransferDirective::build(&ValidationResult::Valid(record("alice")), 2.5, memo())
                .unwrap();
        let signer = Url::parse("https://hivesigner.com/sign/transfer").unwrap();
        assert_eq!(
            directive.fallback_url(&signer).as_str(),
            "https://hivesigner.com/sign/transfer?to=alice&amount=2.500+HBD&memo=kcs-hpos-0007-4242"
        );
        assert!(
            directive
                .deep_link("keychain")
                .unwrap()
                .starts_with("keychain://requestBroadcast?operations=%5B%22transfer%22")
        );
    }
}
