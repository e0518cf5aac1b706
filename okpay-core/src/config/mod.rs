//! Runtime configuration for okpay.
//!
//! These types hold the validated configuration the pipeline runs with.
//! Loading and parsing is handled by the binary.

use crate::director::DeliveryChannels;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

/// Remote services and signing channel addresses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointsConfig {
    /// JSON-RPC node used for account lookups.
    pub registry_rpc: Url,
    /// Endpoint serving USD-quoted exchange rates.
    pub exchange_rates: Url,
    /// Hosted signer transfer page.
    pub fallback_signer: Url,
    /// URI scheme of the native signing agent.
    pub deep_link_scheme: String,
    /// Payment page that prefilled links and scannable codes point to.
    pub payment_page: Url,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimingConfig {
    /// Quiet period after the last recipient input before validating.
    pub debounce: Duration,
    /// How long the deep link gets before the hosted signer is opened.
    pub fallback_after: Duration,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Directory of the dated rate snapshots.
    pub cache_dir: PathBuf,
    /// Directory of the session memo.
    pub session_dir: PathBuf,
}

/// Complete runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutConfig {
    pub endpoints: EndpointsConfig,
    pub timing: TimingConfig,
    pub storage: StorageConfig,
}

impl CheckoutConfig {
    /// Channel settings for the transfer director.
    pub fn delivery_channels(&self) -> DeliveryChannels {
        DeliveryChannels {
            deep_link_scheme: self.endpoints.deep_link_scheme.clone(),
            fallback_signer: self.endpoints.fallback_signer.clone(),
            fallback_after: self.timing.fallback_after,
        }
    }
}
