use super::amounts::AmountPair;
use crate::currency::ExchangeRateSnapshot;
use crate::director::{DirectiveError, TransferDirective};
use crate::processors::AccountStatus;
use okpay_sdk::objects::{
    AccountName, CurrencyInfo, HbdAmount, Memo, PaymentQuery, REFERENCE_CURRENCY,
    SETTLEMENT_ASSET,
};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors returned by checkout state operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    #[error("unsupported currency: {0}")]
    UnsupportedCurrency(String),

    #[error("{0} amounts need exchange rates, which are unavailable")]
    LocalCurrencyUnavailable(&'static str),

    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),

    #[error("no rate to convert between {from} and {to}")]
    ConversionFailed { from: &'static str, to: &'static str },

    #[error("recipient account has not been validated")]
    AccountNotReady,

    #[error(transparent)]
    Directive(#[from] DirectiveError),
}

/// Amounts formatted for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayAmounts {
    /// Local amount with symbol and code, absent in reference mode
    pub local: Option<String>,
    /// Settlement amount with asset suffix
    pub settlement: Option<String>,
}

/// Application state of one payment request.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    memo: Memo,
    snapshot: Option<ExchangeRateSnapshot>,
    amounts: AmountPair,
    account: AccountStatus,
}

impl CheckoutSession {
    /// Start in the reference currency with no amount and no recipient.
    pub fn new(memo: Memo, snapshot: Option<ExchangeRateSnapshot>) -> Self {
        Self {
            memo,
            snapshot,
            amounts: AmountPair::new(CurrencyInfo::reference()),
            account: AccountStatus::Idle,
        }
    }

    pub fn memo(&self) -> &Memo {
        &self.memo
    }

    pub fn snapshot(&self) -> Option<&ExchangeRateSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn amounts(&self) -> &AmountPair {
        &self.amounts
    }

    pub fn currency(&self) -> &'static CurrencyInfo {
        self.amounts.currency()
    }

    pub fn account_status(&self) -> &AccountStatus {
        &self.account
    }

    /// Local-currency entry needs a snapshot.
    pub fn local_currency_available(&self) -> bool {
        self.snapshot.is_some()
    }

    /// Switch the currency amounts are entered in.
    pub fn set_currency(&mut self, code: &str) -> Result<(), CheckoutError> {
        let currency = CurrencyInfo::lookup(code)
            .ok_or_else(|| CheckoutError::UnsupportedCurrency(code.to_owned()))?;
        if !currency.is_reference() && !self.local_currency_available() {
            return Err(CheckoutError::LocalCurrencyUnavailable(currency.code));
        }
        debug!(currency = currency.code, "Currency mode changed");
        self.amounts.set_currency(currency, self.snapshot.as_ref());
        Ok(())
    }

    /// Enter an amount in the active currency. An empty string clears both
    /// sides.
    pub fn set_local_amount(&mut self, raw: &str) -> Result<(), CheckoutError> {
        let amount = parse_amount(raw)?;
        self.amounts.set_local(amount, self.snapshot.as_ref());
        if amount.is_some() && self.amounts.settlement().is_none() {
            return Err(CheckoutError::ConversionFailed {
                from: self.currency().code,
                to: REFERENCE_CURRENCY,
            });
        }
        Ok(())
    }

    /// Enter the settlement amount directly. An empty string clears both
    /// sides.
    pub fn set_settlement_amount(&mut self, raw: &str) -> Result<(), CheckoutError> {
        let amount = parse_amount(raw)?;
        self.amounts.set_settlement(amount, self.snapshot.as_ref());
        if amount.is_some() && self.amounts.local().is_none() {
            return Err(CheckoutError::ConversionFailed {
                from: REFERENCE_CURRENCY,
                to: self.currency().code,
            });
        }
        Ok(())
    }

    /// Record the latest recipient status published by the account watcher.
    pub fn apply_account_status(&mut self, status: AccountStatus) {
        self.account = status;
    }

    /// Prefill from payment page parameters.
    ///
    /// The currency is applied first, so the amount is read in whichever mode
    /// ends up active. Unusable values are logged and skipped. Returns the
    /// recipient to feed into account validation.
    pub fn apply_query(&mut self, query: &PaymentQuery) -> Option<AccountName> {
        if let Some(currency) = query.currency {
            if let Err(e) = self.set_currency(currency.code) {
                warn!(error = %e, "Ignoring currency from payment link");
            }
        }
        if let Some(amount) = &query.amount {
            let applied = if self.currency().is_reference() {
                self.set_settlement_amount(amount)
            } else {
                self.set_local_amount(amount)
            };
            if let Err(e) = applied {
                warn!(error = %e, "Ignoring amount from payment link");
            }
        }
        query.recipient.clone()
    }

    /// True once the recipient resolved valid and the settlement amount is
    /// still positive at on-chain precision.
    pub fn can_submit(&self) -> bool {
        let account_ready = matches!(
            &self.account,
            AccountStatus::Resolved { candidate, result }
                if result.is_valid() && candidate.len() >= 3
        );
        let amount_ready = self
            .amounts
            .settlement()
            .is_some_and(|amount| HbdAmount::from_f64(amount).is_ok());
        account_ready && amount_ready
    }

    /// Build the directive for the current state.
    pub fn prepare_directive(&self) -> Result<TransferDirective, CheckoutError> {
        let AccountStatus::Resolved { result, .. } = &self.account else {
            return Err(CheckoutError::AccountNotReady);
        };
        let amount = self
            .amounts
            .settlement()
            .ok_or_else(|| CheckoutError::InvalidAmount(String::new()))?;
        Ok(TransferDirective::build(result, amount, self.memo.clone())?)
    }

    pub fn display_amounts(&self) -> DisplayAmounts {
        let currency = self.currency();
        let local = if currency.is_reference() {
            None
        } else {
            self.amounts
                .local()
                .map(|amount| format!("{}{amount:.2} {}", currency.symbol, currency.code))
        };
        DisplayAmounts {
            local,
            settlement: self
                .amounts
                .settlement()
                .map(|amount| format!("{amount:.2} {SETTLEMENT_ASSET}")),
        }
    }
}

fn parse_amount(raw: &str) -> Result<Option<f64>, CheckoutError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(Some(amount)),
        _ => Err(CheckoutError::InvalidAmount(trimmed.to_owned())),
    }
}
