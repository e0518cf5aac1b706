use super::rate_cache::RateCache;
use super::snapshot::ExchangeRateSnapshot;
use crate::storage::KeyValueStore;
use async_trait::async_trait;
use kanau::processor::Processor;
use okpay_sdk::client::{ClientError, RatesClient, RatesResponse};
use okpay_sdk::objects::REFERENCE_CURRENCY;
use std::collections::BTreeMap;
use std::convert::Infallible;
use thiserror::Error;
use time::{Date, OffsetDateTime, UtcOffset};
use tracing::{debug, info, warn};

/// Errors a rate source can report. Never leaves the converter.
#[derive(Debug, Error)]
pub enum RateFetchError {
    /// Exchange rate API error
    #[error("exchange rate API error: {0}")]
    Client(#[from] ClientError),

    /// Source answered without usable rates
    #[error("no usable rates: {0}")]
    Unusable(String),
}

/// Where fresh USD-quoted rates come from.
#[async_trait]
pub trait RateSource: Send + Sync {
    async fn latest_rates(&self) -> Result<BTreeMap<String, f64>, RateFetchError>;
}

#[async_trait]
impl RateSource for RatesClient {
    async fn latest_rates(&self) -> Result<BTreeMap<String, f64>, RateFetchError> {
        usable_rates(self.latest().await?)
    }
}

/// Accept a rate body only when it is quoted against the reference currency
/// and carries at least one rate.
fn usable_rates(response: RatesResponse) -> Result<BTreeMap<String, f64>, RateFetchError> {
    if let Some(base) = response.base.as_deref() {
        if base != REFERENCE_CURRENCY {
            return Err(RateFetchError::Unusable(format!(
                "rates quoted against {base}"
            )));
        }
    }
    if response.rates.is_empty() {
        return Err(RateFetchError::Unusable("empty rate table".to_owned()));
    }
    Ok(response.rates)
}

#[async_trait]
impl<T: RateSource + ?Sized> RateSource for std::sync::Arc<T> {
    async fn latest_rates(&self) -> Result<BTreeMap<String, f64>, RateFetchError> {
        (**self).latest_rates().await
    }
}

/// Today's date at `offset`.
///
/// The local offset can only be read reliably while the process is still
/// single-threaded, so callers resolve it once at startup and pass it in.
pub fn local_today(offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(offset).date()
}

/// Request for the snapshot valid on `today`.
#[derive(Debug, Clone, Copy)]
pub struct FetchSnapshot {
    pub today: Date,
}

/// Fetches, caches and serves exchange-rate snapshots.
pub struct CurrencyConverter<R, S> {
    source: R,
    cache: RateCache<S>,
    utc_offset: UtcOffset,
}

impl<R: RateSource, S: KeyValueStore> CurrencyConverter<R, S> {
    /// Create a converter whose cache days follow UTC.
    pub fn new(source: R, store: S) -> Self {
        Self {
            source,
            cache: RateCache::new(store),
            utc_offset: UtcOffset::UTC,
        }
    }

    /// Key the cache by the calendar day at `offset` instead of UTC.
    pub fn with_utc_offset(mut self, offset: UtcOffset) -> Self {
        self.utc_offset = offset;
        self
    }

    /// Snapshot for today's local date, or `None` when conversion is
    /// unavailable.
    pub async fn fetch_snapshot(&self) -> Option<ExchangeRateSnapshot> {
        let today = local_today(self.utc_offset);
        let Ok(snapshot) = self.process(FetchSnapshot { today }).await;
        snapshot
    }
}

impl<R: RateSource, S: KeyValueStore> Processor<FetchSnapshot> for CurrencyConverter<R, S> {
    type Output = Option<ExchangeRateSnapshot>;
    type Error = Infallible;

    /// Same-day cache hit, else fetch and cache under today, else fall back
    /// to yesterday's cached snapshot.
    #[tracing::instrument(skip_all, fields(today = %request.today), name = "FetchSnapshot")]
    async fn process(
        &self,
        request: FetchSnapshot,
    ) -> Result<Option<ExchangeRateSnapshot>, Infallible> {
        let today_key = RateCache::<S>::key_for(request.today);
        if let Some(cached) = self.cache.get(&today_key) {
            debug!(key = %today_key, "Using cached rate snapshot");
            return Ok(Some(cached));
        }

        match self.source.latest_rates().await {
            Ok(rates) => {
                let snapshot = ExchangeRateSnapshot::new(request.today, rates);
                self.cache.set(&today_key, &snapshot);
                info!(rates = snapshot.rates().len(), "Fetched fresh rate snapshot");
                Ok(Some(snapshot))
            }
            Err(e) => {
                warn!(error = %e, "Rate fetch failed, trying previous day's snapshot");
                let fallback = request
                    .today
                    .previous_day()
                    .and_then(|yesterday| self.cache.get(&RateCache::<S>::key_for(yesterday)));
                if fallback.is_none() {
                    warn!("No cached rates available, local currency conversion disabled");
                }
                Ok(fallback)
            }
        }
    }
}

/// Convert `amount` between two currencies through the reference currency.
///
/// A missing snapshot, a zero or NaN amount, or identical currencies return
/// the amount unchanged without touching any rate. A missing or zero rate
/// for either side yields `None`.
pub fn convert(
    amount: f64,
    from: &str,
    to: &str,
    snapshot: Option<&ExchangeRateSnapshot>,
) -> Option<f64> {
    let Some(snapshot) = snapshot else {
        return Some(amount);
    };
    if amount == 0.0 || amount.is_nan() || from == to {
        return Some(amount);
    }

    let reference_amount = if from == REFERENCE_CURRENCY {
        amount
    } else {
        amount / snapshot.rate(from)?
    };

    if to == REFERENCE_CURRENCY {
        return Some(reference_amount);
    }
    Some(reference_amount * snapshot.rate(to)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use time::macros::date;
    use url::Url;

    /// Rate source that either returns a fixed table or fails, counting calls.
    struct MockSource {
        rates: Option<BTreeMap<String, f64>>,
        calls: AtomicUsize,
    }

    impl MockSource {
        fn ok(rates: &[(&str, f64)]) -> Self {
            Self {
                rates: Some(rates.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                rates: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RateSource for MockSource {
        async fn latest_rates(&self) -> Result<BTreeMap<String, f64>, RateFetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.rates
                .clone()
                .ok_or_else(|| RateFetchError::Unusable("offline".to_owned()))
        }
    }

    fn snapshot(rates: &[(&str, f64)]) -> ExchangeRateSnapshot {
        ExchangeRateSnapshot::new(
            date!(2026 - 10 - 16),
            rates.iter().map(|(k, v)| ((*k).to_owned(), *v)).collect(),
        )
    }

    const TODAY: Date = date!(2026 - 10 - 16);
    const YESTERDAY: Date = date!(2026 - 10 - 15);

    #[tokio::test]
    async fn test_fetch_caches_under_today() {
        let source = Arc::new(MockSource::ok(&[("EUR", 0.9)]));
        let store = Arc::new(MemoryStore::new());
        let converter = CurrencyConverter::new(source.clone(), store.clone());

        let first = converter.process(FetchSnapshot { today: TODAY }).await.unwrap();
        let second = converter.process(FetchSnapshot { today: TODAY }).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(first.unwrap().date(), TODAY);
        assert_eq!(source.calls(), 1, "second call must be served from cache");
        assert!(store.get_item("okpay_rates_2026-10-16").unwrap().is_some());
    }

    #[tokio::test]
    async fn test_failed_fetch_falls_back_to_yesterday() {
        let store = Arc::new(MemoryStore::new());
        let yesterday = ExchangeRateSnapshot::new(
            YESTERDAY,
            BTreeMap::from([("ARS".to_owned(), 880.0)]),
        );
        RateCache::new(store.clone()).set("okpay_rates_2026-10-15", &yesterday);

        let converter = CurrencyConverter::new(MockSource::failing(), store.clone());
        let result = converter.process(FetchSnapshot { today: TODAY }).await.unwrap();

        assert_eq!(result, Some(yesterday));
        // The degraded snapshot is not re-filed under today.
        assert!(store.get_item("okpay_rates_2026-10-16").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_failed_fetch_without_cache_is_none() {
        let converter = CurrencyConverter::new(MockSource::failing(), MemoryStore::new());
        let result = converter.process(FetchSnapshot { today: TODAY }).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_older_snapshots_are_not_used() {
        let store = Arc::new(MemoryStore::new());
        RateCache::new(store.clone()).set(
            "okpay_rates_2026-10-14",
            &snapshot(&[("EUR", 0.9)]),
        );
        let converter = CurrencyConverter::new(MockSource::failing(), store);
        let result = converter.process(FetchSnapshot { today: TODAY }).await.unwrap();
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_fetch_snapshot_keys_cache_by_offset_day() {
        let offset = UtcOffset::from_hms(14, 0, 0).unwrap();
        let store = Arc::new(MemoryStore::new());
        let converter = CurrencyConverter::new(MockSource::ok(&[("EUR", 0.9)]), store.clone())
            .with_utc_offset(offset);

        let before = local_today(offset);
        let snapshot = converter.fetch_snapshot().await.unwrap();
        let after = local_today(offset);

        assert!(snapshot.date() == before || snapshot.date() == after);
        let key = RateCache::<Arc<MemoryStore>>::key_for(snapshot.date());
        assert!(store.get_item(&key).unwrap().is_some());
    }

    #[test]
    fn test_local_today_follows_offset() {
        let ahead = UtcOffset::from_hms(14, 0, 0).unwrap();
        let behind = UtcOffset::from_hms(-12, 0, 0).unwrap();
        let utc = OffsetDateTime::now_utc().date();
        let east = local_today(ahead);
        let west = local_today(behind);
        assert!(east == utc || east == utc.next_day().unwrap());
        assert!(west == utc || west == utc.previous_day().unwrap());
        assert!(east > west);
    }

    fn rates_body(json: &str) -> RatesResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_usable_rates_accepts_reference_quoted_table() {
        let rates =
            usable_rates(rates_body(r#"{"base":"USD","rates":{"USD":1,"EUR":0.92}}"#)).unwrap();
        assert_eq!(rates.get("EUR"), Some(&0.92));
        // A body without a base is taken as reference-quoted.
        assert!(usable_rates(rates_body(r#"{"rates":{"ARS":912.5}}"#)).is_ok());
    }

    #[test]
    fn test_usable_rates_rejects_foreign_base_and_empty_table() {
        let foreign = usable_rates(rates_body(r#"{"base":"EUR","rates":{"USD":1.08}}"#));
        assert!(matches!(
            foreign,
            Err(RateFetchError::Unusable(msg)) if msg.contains("EUR")
        ));
        let empty = usable_rates(rates_body(r#"{"base":"USD","rates":{}}"#));
        assert!(matches!(empty, Err(RateFetchError::Unusable(_))));
    }

    #[tokio::test]
    async fn test_unreachable_rate_endpoint_is_client_error() {
        let client = RatesClient::new(Url::parse("http://127.0.0.1:9/latest/USD").unwrap());
        let result = RateSource::latest_rates(&client).await;
        assert!(matches!(result, Err(RateFetchError::Client(_))));
    }

    #[test]
    fn test_same_currency_is_identity() {
        let s = snapshot(&[("EUR", 0.9)]);
        for code in ["USD", "EUR", "GTQ", "ZZZ"] {
            for amount in [0.0, 1.0, 12.345, -4.0, 1e9] {
                assert_eq!(convert(amount, code, code, Some(&s)), Some(amount));
                assert_eq!(convert(amount, code, code, None), Some(amount));
            }
        }
    }

    #[test]
    fn test_zero_and_missing_snapshot_short_circuit() {
        let s = snapshot(&[("EUR", 0.9)]);
        assert_eq!(convert(0.0, "EUR", "USD", Some(&s)), Some(0.0));
        // Short circuit even when the rate would be missing.
        assert_eq!(convert(0.0, "JPY", "USD", Some(&s)), Some(0.0));
        assert_eq!(convert(25.0, "EUR", "USD", None), Some(25.0));
        assert!(convert(f64::NAN, "EUR", "USD", Some(&s)).unwrap().is_nan());
    }

    #[test]
    fn test_conversion_through_reference() {
        let s = snapshot(&[("USD", 1.0), ("ARS", 900.0), ("EUR", 0.5)]);
        let usd = convert(1000.0, "ARS", "USD", Some(&s)).unwrap();
        assert!((usd - 1.111_111).abs() < 1e-6);
        assert_eq!(format!("{usd:.2}"), "1.11");

        assert_eq!(convert(10.0, "USD", "EUR", Some(&s)), Some(5.0));
        assert_eq!(convert(900.0, "ARS", "EUR", Some(&s)), Some(0.5));
    }

    #[test]
    fn test_missing_rate_is_none() {
        let s = snapshot(&[("EUR", 0.5), ("XXX", 0.0)]);
        assert_eq!(convert(10.0, "JPY", "USD", Some(&s)), None);
        assert_eq!(convert(10.0, "USD", "JPY", Some(&s)), None);
        assert_eq!(convert(10.0, "EUR", "JPY", Some(&s)), None);
        assert_eq!(convert(10.0, "XXX", "USD", Some(&s)), None);
    }

    #[test]
    fn test_round_trip() {
        let s = snapshot(&[("EUR", 0.923_41), ("NGN", 1_532.7), ("COP", 4_102.25)]);
        for code in ["EUR", "NGN", "COP"] {
            for amount in [0.01, 1.0, 10.0, 1234.56, 99_999.99] {
                let there = convert(amount, "USD", code, Some(&s)).unwrap();
                let back = convert(there, code, "USD", Some(&s)).unwrap();
                assert!(
                    (back - amount).abs() <= amount.abs() * 1e-12,
                    "{amount} USD -> {code} -> USD gave {back}"
                );
            }
        }
    }
}
