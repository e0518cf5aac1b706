//! Signing-channel links for a transfer.
//!
//! Two channels are addressable by URL:
//!
//! - a native signing agent registered for a custom scheme, reached through
//!   `<scheme>://requestBroadcast?operations=<json>`;
//! - a hosted signer page taking the transfer as query parameters.

use crate::objects::{AccountName, HbdAmount, Memo};
use serde::Serialize;
use url::Url;

/// Placeholder for the sending account; the signing agent fills it in.
pub const FROM_PLACEHOLDER: &str = "<FROM>";

#[derive(Debug, Serialize)]
struct TransferOp<'a> {
    from: &'a str,
    to: &'a str,
    amount: String,
    memo: &'a str,
}

/// Deep link asking the native signing agent to broadcast one transfer.
///
/// The operation is encoded as the Hive `["transfer", {...}]` pair.
pub fn deep_link(
    scheme: &str,
    to: &AccountName,
    amount: &HbdAmount,
    memo: &Memo,
) -> Result<String, serde_json::Error> {
    let op = (
        "transfer",
        TransferOp {
            from: FROM_PLACEHOLDER,
            to: to.as_str(),
            amount: amount.with_asset(),
            memo: memo.as_str(),
        },
    );
    let json = serde_json::to_string(&op)?;
    Ok(format!(
        "{scheme}://requestBroadcast?operations={}",
        urlencoding::encode(&json)
    ))
}

/// Hosted signer page for the same transfer.
pub fn fallback_signer_url(
    signer: &Url,
    to: &AccountName,
    amount: &HbdAmount,
    memo: &Memo,
) -> Url {
    let mut url = signer.clone();
    url.query_pairs_mut()
        .append_pair("to", to.as_str())
        .append_pair("amount", &amount.with_asset())
        .append_pair("memo", memo.as_str());
    url
}
