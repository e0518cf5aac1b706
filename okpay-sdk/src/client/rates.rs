//! Exchange rate client.

use std::collections::BTreeMap;

use reqwest::Client;
use serde::Deserialize;
use url::Url;

use super::{ClientError, parse_response};

/// Body of the latest-rates endpoint.
///
/// Rates map a currency code to the amount of that currency one unit of the
/// base currency buys.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RatesResponse {
    #[serde(default)]
    pub base: Option<String>,
    pub rates: BTreeMap<String, f64>,
}

/// Typed client for a USD-based latest-rates endpoint.
#[derive(Debug, Clone)]
pub struct RatesClient {
    http: Client,
    endpoint: Url,
}

impl RatesClient {
    /// Create a new `RatesClient`.
    ///
    /// * `endpoint` – full URL of the latest-rates resource, e.g.
    ///   `https://api.exchangerate-api.com/v4/latest/USD`.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one.
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `GET <endpoint>` – fetch the latest rates.
    pub async fn latest(&self) -> Result<RatesResponse, ClientError> {
        let resp = self.http.get(self.endpoint.clone()).send().await?;
        parse_response(resp).await
    }
}
