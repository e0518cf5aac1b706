use crate::state::AppState;
use clap::Args;
use okpay_core::account::ValidationResult;
use okpay_sdk::objects::AccountName;

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Account to validate; normalized before lookup
    pub account: String,
}

pub async fn run(state: &AppState, args: CheckArgs) -> anyhow::Result<()> {
    let candidate = AccountName::sanitize(&args.account);
    if candidate.as_str() != args.account {
        println!("normalized: {candidate}");
    }

    let result = state.validator().validate(candidate.clone()).await;
    println!("{}", result.status_text());

    if let ValidationResult::Valid(record) = &result {
        println!("avatar: {}", candidate.avatar_url());
        if let Some(created) = &record.created {
            println!("created: {created}");
        }
        if let Some(hbd) = &record.hbd_balance {
            println!("hbd balance: {hbd}");
        }
    }

    if !result.is_valid() {
        anyhow::bail!("{candidate:?} is not a valid recipient");
    }
    Ok(())
}
