pub mod account;
pub mod amount;
pub mod currency;
pub mod memo;
pub mod query;

pub use account::{AccountName, AccountRecord, MAX_ACCOUNT_LEN};
pub use amount::{HbdAmount, SETTLEMENT_ASSET};
pub use currency::{CurrencyInfo, REFERENCE_CURRENCY, SUPPORTED_CURRENCIES};
pub use memo::Memo;
pub use query::PaymentQuery;
