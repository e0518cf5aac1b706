use crate::state::AppState;
use clap::Args;
use okpay_core::account::{InvalidReason, ValidationResult};
use okpay_sdk::objects::AccountName;
use okpay_sdk::objects::query::payment_page_url;
use url::Url;

#[derive(Args, Debug)]
pub struct QrArgs {
    /// Recipient to prefill on the payment page
    #[arg(long)]
    pub to: String,
}

pub async fn run(state: &AppState, args: QrArgs) -> anyhow::Result<()> {
    let recipient = AccountName::sanitize(&args.to);
    let result = state.validator().validate(recipient.clone()).await;
    eprintln!("account: {}", result.status_text());

    let link = page_link(&state.config.endpoints.payment_page, &recipient, &result)
        .ok_or_else(|| anyhow::anyhow!("{:?} is not a valid account name", args.to))?;
    println!("{link}");
    Ok(())
}

/// Payment page link for `recipient`. A well-formed name the registry does
/// not know still gets a link.
fn page_link(page: &Url, recipient: &AccountName, result: &ValidationResult) -> Option<Url> {
    match result {
        ValidationResult::Invalid(InvalidReason::Empty | InvalidReason::Format) => None,
        _ => Some(payment_page_url(page, recipient)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use okpay_sdk::objects::AccountRecord;

    fn page() -> Url {
        Url::parse("http://menobass.github.io/okpay").unwrap()
    }

    fn record(name: &str) -> AccountRecord {
        AccountRecord {
            id: 7,
            name: name.to_owned(),
            created: None,
            balance: None,
            hbd_balance: None,
        }
    }

    #[test]
    fn test_valid_and_unknown_accounts_get_a_link() {
        let alice = AccountName::sanitize("Alice");
        let link = page_link(&page(), &alice, &ValidationResult::Valid(record("alice"))).unwrap();
        assert_eq!(link.as_str(), "http://menobass.github.io/okpay?vendor=alice");

        let unknown = ValidationResult::Invalid(InvalidReason::NotFound);
        assert!(page_link(&page(), &alice, &unknown).is_some());
    }

    #[test]
    fn test_malformed_accounts_get_no_link() {
        for (raw, reason) in [("xx", InvalidReason::Format), ("  ", InvalidReason::Empty)] {
            let result = ValidationResult::Invalid(reason);
            assert_eq!(page_link(&page(), &AccountName::sanitize(raw), &result), None);
        }
    }
}
