use crate::navigator::{PrintNavigator, SystemNavigator};
use crate::state::AppState;
use clap::Args;
use okpay_core::checkout::CheckoutSession;
use okpay_core::director::{DeliveryOutcome, Navigator, RaceTarget, TransferDirector};
use okpay_core::processors::{AccountStatus, AccountWatcher, account_input_channel};
use okpay_sdk::objects::PaymentQuery;
use std::sync::Arc;
use tokio::sync::watch;
use url::Url;

#[derive(Args, Debug)]
pub struct PayArgs {
    /// Recipient account
    #[arg(long)]
    pub to: Option<String>,

    /// Amount, in the currency given by --cur (default USD)
    #[arg(long)]
    pub amount: Option<String>,

    /// Currency the amount is entered in
    #[arg(long)]
    pub cur: Option<String>,

    /// Payment page link to prefill from (vendor/to, amount, cur)
    #[arg(long)]
    pub link: Option<Url>,

    /// Print signer links instead of opening them
    #[arg(long)]
    pub print_only: bool,
}

pub async fn run(
    state: &AppState,
    args: PayArgs,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let memo = state.memo_session().load_or_generate();
    let snapshot = state.converter().fetch_snapshot().await;
    let mut session = CheckoutSession::new(memo, snapshot);
    if !session.local_currency_available() {
        println!("exchange rates unavailable, amounts are in USD only");
    }

    // Link values first, explicit flags override them.
    let mut recipient = match &args.link {
        Some(link) => session
            .apply_query(&PaymentQuery::from_url(link))
            .map(|name| name.to_string()),
        None => None,
    };
    if let Some(to) = args.to {
        recipient = Some(to);
    }
    if let Some(code) = &args.cur {
        session.set_currency(code)?;
    }
    if let Some(amount) = &args.amount {
        if session.currency().is_reference() {
            session.set_settlement_amount(amount)?;
        } else {
            session.set_local_amount(amount)?;
        }
    }
    let Some(recipient) = recipient else {
        anyhow::bail!("no recipient given, use --to or --link");
    };

    resolve_recipient(state, &mut session, recipient, shutdown_rx).await?;

    println!("memo: {}", session.memo());
    let amounts = session.display_amounts();
    if let Some(local) = &amounts.local {
        println!("amount: {local}");
    }
    if let Some(settlement) = &amounts.settlement {
        println!("settlement: {settlement}");
    }
    println!("account: {}", session.account_status().status_text());

    if !session.can_submit() {
        anyhow::bail!("payment request is not ready to submit");
    }
    let directive = session.prepare_directive()?;
    println!(
        "transfer: {} to {} (memo {})",
        directive.amount(),
        directive.to(),
        directive.memo()
    );

    let navigator: Arc<dyn Navigator> = if args.print_only {
        Arc::new(PrintNavigator)
    } else {
        Arc::new(SystemNavigator::new())
    };
    let director = TransferDirector::new(navigator, state.config.delivery_channels());

    match director.deliver(&directive).await {
        DeliveryOutcome::ExtensionHandled { success, message } => {
            if !success {
                anyhow::bail!("signing extension rejected the transfer: {message}");
            }
            println!("signed: {message}");
        }
        DeliveryOutcome::ChannelRaced { target, url } => match target {
            RaceTarget::PrimaryDeepLink => println!("opened native signer: {url}"),
            RaceTarget::FallbackSigner => println!("opened hosted signer: {url}"),
        },
    }
    Ok(())
}

/// Feed `raw` through the account watcher and apply every published status
/// until it settles.
async fn resolve_recipient(
    state: &AppState,
    session: &mut CheckoutSession,
    raw: String,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let (watcher, mut status_rx) =
        AccountWatcher::new(state.validator(), state.config.timing.debounce);
    let (input_tx, input_rx) = account_input_channel();
    let handle = tokio::spawn(watcher.run(input_rx, shutdown_rx));

    input_tx.send(raw).await?;
    drop(input_tx);

    while status_rx.changed().await.is_ok() {
        let status = status_rx.borrow_and_update().clone();
        if let AccountStatus::Checking(candidate) = &status {
            println!("{} {candidate}", status.status_text());
        }
        session.apply_account_status(status);
    }
    handle.await?;
    Ok(())
}
