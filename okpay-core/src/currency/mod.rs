//! Fiat amount conversion against dated exchange-rate snapshots.
//!
//! - [`ExchangeRateSnapshot`]: immutable, dated table of USD-quoted rates
//! - [`RateCache`]: one cached snapshot per calendar day
//! - [`CurrencyConverter`]: read-through fetch with prior-day fallback
//! - [`convert`]: bidirectional conversion through the reference currency

mod converter;
mod rate_cache;
mod snapshot;

pub use converter::{CurrencyConverter, FetchSnapshot, RateFetchError, RateSource, convert, local_today};
pub use rate_cache::{RATE_CACHE_PREFIX, RateCache};
pub use snapshot::ExchangeRateSnapshot;
