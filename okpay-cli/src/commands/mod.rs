//! Subcommands of the `okpay` binary.

pub mod check;
pub mod memo;
pub mod pay;
pub mod qr;
pub mod rates;

use crate::state::AppState;
use clap::Subcommand;
use tokio::sync::watch;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a payment request, validate the recipient and hand it to a signer
    Pay(pay::PayArgs),
    /// Validate a recipient account
    Check(check::CheckArgs),
    /// Show exchange rates or convert an amount
    Rates(rates::RatesArgs),
    /// Print the payment page link for a recipient's scannable code
    Qr(qr::QrArgs),
    /// Show or rotate the session memo
    Memo(memo::MemoArgs),
}

/// Run `command` to completion.
pub async fn run(
    command: Command,
    state: &AppState,
    shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    match command {
        Command::Pay(args) => pay::run(state, args, shutdown_rx).await,
        Command::Check(args) => check::run(state, args).await,
        Command::Rates(args) => rates::run(state, args).await,
        Command::Qr(args) => qr::run(state, args).await,
        Command::Memo(args) => memo::run(state, args),
    }
}
