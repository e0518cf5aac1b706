//! Configuration module for the okpay binary.
//!
//! Handles loading configuration from the TOML file and applying CLI
//! overrides.

pub mod file;
pub mod runtime;

use crate::config::file::FileConfig;
use crate::config::runtime::{CheckoutConfig, EndpointsConfig, StorageConfig, TimingConfig};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    ValidationError(String),
}

/// Endpoint overrides given on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub registry_rpc: Option<Url>,
    pub exchange_rates: Option<Url>,
}

/// Configuration loader that handles the complete loading process.
pub struct ConfigLoader {
    config_path: PathBuf,
    overrides: Overrides,
}

impl ConfigLoader {
    /// Create a new config loader.
    pub fn new(config_path: impl AsRef<Path>, overrides: Overrides) -> Self {
        Self {
            config_path: config_path.as_ref().to_path_buf(),
            overrides,
        }
    }

    /// Load and process the configuration.
    ///
    /// This will:
    /// 1. Read the TOML file, using defaults when it does not exist
    /// 2. Apply CLI overrides
    /// 3. Validate the configuration
    pub fn load(&self) -> Result<CheckoutConfig, ConfigError> {
        let file_config = match std::fs::read_to_string(&self.config_path) {
            Ok(content) => toml::from_str(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = ?self.config_path, "No config file, using defaults");
                FileConfig::default()
            }
            Err(e) => return Err(e.into()),
        };
        self.load_from(file_config)
    }

    fn load_from(&self, mut file_config: FileConfig) -> Result<CheckoutConfig, ConfigError> {
        if let Some(rpc) = &self.overrides.registry_rpc {
            file_config.endpoints.registry_rpc = rpc.clone();
        }
        if let Some(rates) = &self.overrides.exchange_rates {
            file_config.endpoints.exchange_rates = rates.clone();
        }

        validate(&file_config)?;
        Ok(build_config(file_config))
    }
}

fn validate(config: &FileConfig) -> Result<(), ConfigError> {
    let scheme = &config.endpoints.deep_link_scheme;
    if scheme.is_empty() || !scheme.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(ConfigError::ValidationError(format!(
            "deep_link_scheme must be non-empty and alphanumeric, got {scheme:?}"
        )));
    }
    if config.timing.debounce_ms == 0 {
        return Err(ConfigError::ValidationError(
            "timing.debounce_ms must be greater than zero".to_string(),
        ));
    }
    if config.timing.fallback_after_ms == 0 {
        return Err(ConfigError::ValidationError(
            "timing.fallback_after_ms must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn build_config(file_config: FileConfig) -> CheckoutConfig {
    let FileConfig {
        endpoints,
        timing,
        storage,
    } = file_config;

    CheckoutConfig {
        endpoints: EndpointsConfig {
            registry_rpc: endpoints.registry_rpc,
            exchange_rates: endpoints.exchange_rates,
            fallback_signer: endpoints.fallback_signer,
            deep_link_scheme: endpoints.deep_link_scheme,
            payment_page: endpoints.payment_page,
        },
        timing: TimingConfig {
            debounce: Duration::from_millis(timing.debounce_ms),
            fallback_after: Duration::from_millis(timing.fallback_after_ms),
            http_timeout: Duration::from_secs(timing.http_timeout_secs),
        },
        storage: StorageConfig {
            cache_dir: storage.cache_dir,
            session_dir: storage.session_dir,
        },
    }
}
