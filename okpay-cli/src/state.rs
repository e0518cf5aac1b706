//! Application state shared by every command.

use crate::config::runtime::CheckoutConfig;
use okpay_core::account::AccountValidator;
use okpay_core::checkout::MemoSession;
use okpay_core::currency::CurrencyConverter;
use okpay_core::storage::FileStore;
use okpay_sdk::client::{RatesClient, RegistryClient};
use std::sync::Arc;
use time::UtcOffset;

/// Clients and stores built from the loaded configuration.
///
/// Cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<CheckoutConfig>,
    pub registry: Arc<RegistryClient>,
    pub rates: Arc<RatesClient>,
    pub cache_store: Arc<FileStore>,
    pub session_store: Arc<FileStore>,
    /// Offset that decides which calendar day cached rates belong to
    pub utc_offset: UtcOffset,
}

impl AppState {
    /// Create the shared HTTP client and everything that hangs off it.
    pub fn new(config: CheckoutConfig, utc_offset: UtcOffset) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.timing.http_timeout)
            .user_agent(concat!("okpay/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let registry = RegistryClient::new(config.endpoints.registry_rpc.clone())
            .with_http_client(http.clone());
        let rates = RatesClient::new(config.endpoints.exchange_rates.clone()).with_http_client(http);

        Ok(Self {
            cache_store: Arc::new(FileStore::new(&config.storage.cache_dir)),
            session_store: Arc::new(FileStore::new(&config.storage.session_dir)),
            registry: Arc::new(registry),
            rates: Arc::new(rates),
            config: Arc::new(config),
            utc_offset,
        })
    }

    pub fn validator(&self) -> AccountValidator<Arc<RegistryClient>> {
        AccountValidator::new(self.registry.clone())
    }

    pub fn converter(&self) -> CurrencyConverter<Arc<RatesClient>, Arc<FileStore>> {
        CurrencyConverter::new(self.rates.clone(), self.cache_store.clone())
            .with_utc_offset(self.utc_offset)
    }

    pub fn memo_session(&self) -> MemoSession<Arc<FileStore>> {
        MemoSession::new(self.session_store.clone())
    }
}
