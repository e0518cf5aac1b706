use async_trait::async_trait;
use kanau::processor::Processor;
use okpay_sdk::client::RegistryClient;
use okpay_sdk::objects::{AccountName, AccountRecord};
use std::convert::Infallible;
use tracing::{debug, warn};

/// Why a candidate was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InvalidReason {
    /// Nothing to look up
    Empty,
    /// Fails the account name pattern
    Format,
    /// Registry returned no record, or could not be reached
    NotFound,
}

/// Verdict of one validation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid(AccountRecord),
    Invalid(InvalidReason),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid(_))
    }

    /// Inline status line shown next to the recipient field.
    pub fn status_text(&self) -> &'static str {
        match self {
            ValidationResult::Valid(_) => "Account valid",
            ValidationResult::Invalid(InvalidReason::NotFound) => "Account not found",
            ValidationResult::Invalid(_) => "Invalid account",
        }
    }
}

/// Batch account lookup against the remote ledger.
///
/// Implementations must not fail: transport and API errors are reported as
/// an empty result.
#[async_trait]
pub trait AccountRegistry: Send + Sync {
    async fn get_accounts(&self, names: &[AccountName]) -> Vec<AccountRecord>;
}

#[async_trait]
impl AccountRegistry for RegistryClient {
    async fn get_accounts(&self, names: &[AccountName]) -> Vec<AccountRecord> {
        match RegistryClient::get_accounts(self, names).await {
            Ok(records) => records,
            Err(e) => {
                warn!(endpoint = %self.endpoint(), error = %e, "Account fetch failed");
                Vec::new()
            }
        }
    }
}

#[async_trait]
impl<T: AccountRegistry + ?Sized> AccountRegistry for std::sync::Arc<T> {
    async fn get_accounts(&self, names: &[AccountName]) -> Vec<AccountRecord> {
        (**self).get_accounts(names).await
    }
}

/// Request to validate one candidate.
#[derive(Debug, Clone)]
pub struct ValidateAccount {
    pub candidate: AccountName,
}

/// Checks a candidate's format and existence.
pub struct AccountValidator<R> {
    registry: R,
}

impl<R: AccountRegistry> AccountValidator<R> {
    pub fn new(registry: R) -> Self {
        Self { registry }
    }

    pub async fn validate(&self, candidate: AccountName) -> ValidationResult {
        let Ok(result) = self.process(ValidateAccount { candidate }).await;
        result
    }
}

impl<R: AccountRegistry> Processor<ValidateAccount> for AccountValidator<R> {
    type Output = ValidationResult;
    type Error = Infallible;

    /// Empty and malformed candidates are rejected without a network call.
    #[tracing::instrument(skip_all, fields(account = %request.candidate), name = "ValidateAccount")]
    async fn process(&self, request: ValidateAccount) -> Result<ValidationResult, Infallible> {
        let candidate = request.candidate;
        if candidate.is_empty() {
            return Ok(ValidationResult::Invalid(InvalidReason::Empty));
        }
        if !candidate.has_valid_format() {
            debug!("Rejected by format check");
            return Ok(ValidationResult::Invalid(InvalidReason::Format));
        }

        let records = self.registry.get_accounts(std::slice::from_ref(&candidate)).await;
        let result = match records.into_iter().next() {
            Some(record) => ValidationResult::Valid(record),
            None => ValidationResult::Invalid(InvalidReason::NotFound),
        };
        debug!(valid = result.is_valid(), "Registry lookup finished");
        Ok(result)
    }
}
