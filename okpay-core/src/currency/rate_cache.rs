use super::snapshot::ExchangeRateSnapshot;
use crate::storage::KeyValueStore;
use time::Date;
use tracing::warn;

/// Prefix of every rate cache key; the calendar date follows.
pub const RATE_CACHE_PREFIX: &str = "okpay_rates_";

/// Date-keyed cache of rate snapshots.
///
/// Best effort in both directions: unreadable, corrupted or unwritable
/// entries are logged and behave as a miss or a no-op.
pub struct RateCache<S> {
    store: S,
}

impl<S: KeyValueStore> RateCache<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Cache key for the snapshot of `date`, e.g. `okpay_rates_2026-10-16`.
    pub fn key_for(date: Date) -> String {
        format!("{RATE_CACHE_PREFIX}{date}")
    }

    pub fn get(&self, key: &str) -> Option<ExchangeRateSnapshot> {
        let raw = match self.store.get_item(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(key, error = %e, "Rate cache read failed");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(key, error = %e, "Discarding corrupted rate cache entry");
                None
            }
        }
    }

    pub fn set(&self, key: &str, snapshot: &ExchangeRateSnapshot) {
        let raw = match serde_json::to_string(snapshot) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(key, error = %e, "Rate snapshot serialization failed");
                return;
            }
        };
        if let Err(e) = self.store.set_item(key, &raw) {
            warn!(key, error = %e, "Rate cache write failed");
        }
    }
}
