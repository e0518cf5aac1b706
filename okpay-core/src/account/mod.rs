//! Recipient account validation.
//!
//! - [`AccountValidator`]: format check, then registry lookup
//! - [`StalenessGuard`]: last-issued-wins gate for concurrent validations

mod staleness;
mod validator;

#[cfg(test)]
pub(crate) use validator::mock;

pub use staleness::{StalenessGuard, ValidationTicket};
pub use validator::{
    AccountRegistry, AccountValidator, InvalidReason, ValidateAccount, ValidationResult,
};
