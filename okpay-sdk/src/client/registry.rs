//! Account registry client (Hive JSON-RPC node).

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use super::{ClientError, parse_response};
use crate::objects::{AccountName, AccountRecord};

const GET_ACCOUNTS: &str = "condenser_api.get_accounts";

/// Typed client for the batch account lookup of a Hive API node.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: Client,
    endpoint: Url,
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a, P> {
    jsonrpc: &'static str,
    method: &'a str,
    params: P,
    id: u64,
}

#[derive(Debug, Deserialize)]
struct RpcResponse<T> {
    #[serde(default)]
    result: Option<T>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

impl RegistryClient {
    /// Create a new `RegistryClient` for the given API node.
    pub fn new(endpoint: Url) -> Self {
        Self {
            http: Client::new(),
            endpoint,
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http = client;
        self
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// `condenser_api.get_accounts` – look up a batch of accounts.
    ///
    /// Accounts that do not exist are simply missing from the result, so an
    /// unknown name yields an empty list rather than an error.
    pub async fn get_accounts(
        &self,
        names: &[AccountName],
    ) -> Result<Vec<AccountRecord>, ClientError> {
        if names.is_empty() {
            return Ok(Vec::new());
        }
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: GET_ACCOUNTS,
            params: [names],
            id: 1,
        };

        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let body: RpcResponse<Vec<AccountRecord>> = parse_response(resp).await?;
        into_result(body)
    }
}

fn into_result<T: Default>(body: RpcResponse<T>) -> Result<T, ClientError> {
    if let Some(error) = body.error {
        return Err(ClientError::Rpc {
            code: error.code,
            message: error.message,
        });
    }
    Ok(body.result.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decode(json: &str) -> Result<Vec<AccountRecord>, ClientError> {
        let body: RpcResponse<Vec<AccountRecord>> = serde_json::from_str(json).unwrap();
        into_result(body)
    }

    #[test]
    fn test_request_shape() {
        let names = [AccountName::sanitize("alice")];
        let request = RpcRequest {
            jsonrpc: "2.0",
            method: GET_ACCOUNTS,
            params: [&names[..]],
            id: 1,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "jsonrpc": "2.0",
                "method": "condenser_api.get_accounts",
                "params": [["alice"]],
                "id": 1
            })
        );
    }

    #[test]
    fn test_decode_found_account() {
        let accounts = decode(
            r#"{"jsonrpc":"2.0","result":[{"id":7,"name":"alice","hbd_balance":"1.000 HBD"}],"id":1}"#,
        )
        .unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].name, "alice");
    }

    #[test]
    fn test_decode_missing_result_is_empty() {
        assert!(decode(r#"{"jsonrpc":"2.0","result":[],"id":1}"#).unwrap().is_empty());
        assert!(decode(r#"{"jsonrpc":"2.0","id":1}"#).unwrap().is_empty());
    }

    #[test]
    fn test_decode_rpc_error() {
        let err = decode(
            r#"{"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid parameters"},"id":1}"#,
        )
        .unwrap_err();
        assert!(matches!(err, ClientError::Rpc { code: -32602, .. }));
    }

    #[tokio::test]
    async fn test_empty_batch_skips_network() {
        // Port 9 (discard) is never contacted for an empty batch.
        let client = RegistryClient::new(Url::parse("http://127.0.0.1:9/").unwrap());
        assert!(client.get_accounts(&[]).await.unwrap().is_empty());
    }
}
