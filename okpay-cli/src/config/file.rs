//! TOML file configuration structures.
//!
//! These structs directly map to the `okpay.toml` file format. Every section
//! and field is optional.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use url::Url;

/// Root configuration structure as read from the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

/// Remote services and signing channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EndpointsConfig {
    /// JSON-RPC node for account lookups.
    pub registry_rpc: Url,
    /// Exchange rate endpoint quoting against USD.
    pub exchange_rates: Url,
    /// Hosted signer transfer page.
    pub fallback_signer: Url,
    /// Scheme registered by the native signing agent.
    pub deep_link_scheme: String,
    /// Payment page for prefilled links.
    pub payment_page: Url,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            registry_rpc: default_url("https://api.hive.blog"),
            exchange_rates: default_url("https://api.exchangerate-api.com/v4/latest/USD"),
            fallback_signer: default_url("https://hivesigner.com/sign/transfer"),
            deep_link_scheme: "keychain".to_string(),
            payment_page: default_url("http://menobass.github.io/okpay"),
        }
    }
}

fn default_url(s: &str) -> Url {
    Url::parse(s).expect("valid default URL")
}

/// Timing section, in milliseconds unless named otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    pub debounce_ms: u64,
    pub fallback_after_ms: u64,
    pub http_timeout_secs: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 300,
            fallback_after_ms: 1200,
            http_timeout_secs: 15,
        }
    }
}

/// Where rate snapshots and the session memo are kept.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub cache_dir: PathBuf,
    pub session_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(".okpay/cache"),
            session_dir: PathBuf::from(".okpay/session"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.endpoints.registry_rpc.as_str(), "https://api.hive.blog/");
        assert_eq!(config.endpoints.deep_link_scheme, "keychain");
        assert_eq!(config.timing.debounce_ms, 300);
        assert_eq!(config.timing.fallback_after_ms, 1200);
        assert_eq!(config.storage.cache_dir, PathBuf::from(".okpay/cache"));
    }

    #[test]
    fn test_partial_sections() {
        let toml_str = r#"
[endpoints]
registry_rpc = "https://rpc.example.net"
deep_link_scheme = "hivesigner"

[timing]
fallback_after_ms = 2500
"#;
        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.endpoints.registry_rpc.host_str(), Some("rpc.example.net"));
        assert_eq!(config.endpoints.deep_link_scheme, "hivesigner");
        assert_eq!(
            config.endpoints.fallback_signer.as_str(),
            "https://hivesigner.com/sign/transfer"
        );
        assert_eq!(config.timing.fallback_after_ms, 2500);
        assert_eq!(config.timing.debounce_ms, 300);
        assert_eq!(config.storage.session_dir, PathBuf::from(".okpay/session"));
    }

    #[test]
    fn test_bad_values_are_rejected() {
        assert!(toml::from_str::<FileConfig>("[endpoints]\nregistry_rpc = \"not a url\"").is_err());
        assert!(toml::from_str::<FileConfig>("[timing]\ndebounce_ms = -1").is_err());
        assert!(toml::from_str::<FileConfig>("[server]\nlisten = \"0.0.0.0:80\"").is_err());
    }
}
