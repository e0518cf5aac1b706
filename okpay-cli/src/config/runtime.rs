//! Runtime configuration re-exports.
//!
//! The actual config types are defined in `okpay-core::config`.

pub use okpay_core::config::{CheckoutConfig, EndpointsConfig, StorageConfig, TimingConfig};
