//! AccountWatcher processor.
//!
//! The AccountWatcher is responsible for:
//! - Receiving raw recipient input as it is typed
//! - Marking the recipient as being checked as soon as new input arrives
//! - Waiting for a quiet period after the last input before validating
//! - Issuing validations through the [`StalenessGuard`] so that only the most
//!   recently issued candidate can update the published status
//! - Publishing [`AccountStatus`] on a `watch` channel
//!
//! Validations run concurrently with further input, but all on the watcher's
//! own task; there is no cancellation, superseded results are ignored.

use crate::account::{AccountRegistry, AccountValidator, StalenessGuard, ValidationResult};
use futures_util::StreamExt;
use futures_util::stream::FuturesUnordered;
use okpay_sdk::objects::AccountName;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info};

/// Buffer size of the raw input channel.
pub const ACCOUNT_INPUT_BUFFER: usize = 64;

/// Sender handle for raw recipient input.
pub type AccountInputSender = mpsc::Sender<String>;
/// Receiver handle for raw recipient input.
pub type AccountInputReceiver = mpsc::Receiver<String>;

/// Create a new raw recipient input channel.
pub fn account_input_channel() -> (AccountInputSender, AccountInputReceiver) {
    mpsc::channel(ACCOUNT_INPUT_BUFFER)
}

/// State of the recipient field as seen by the rest of the checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AccountStatus {
    /// No candidate entered
    #[default]
    Idle,
    /// Validation issued and not yet answered
    Checking(AccountName),
    /// Latest issued validation answered
    Resolved {
        candidate: AccountName,
        result: ValidationResult,
    },
}

impl AccountStatus {
    pub fn status_text(&self) -> &'static str {
        match self {
            AccountStatus::Idle => "",
            AccountStatus::Checking(_) => "Checking account…",
            AccountStatus::Resolved { result, .. } => result.status_text(),
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, AccountStatus::Checking(_))
    }
}

/// Debounced, staleness-guarded recipient validation.
pub struct AccountWatcher<R> {
    validator: AccountValidator<R>,
    quiet_period: Duration,
    status_tx: watch::Sender<AccountStatus>,
}

impl<R: AccountRegistry> AccountWatcher<R> {
    /// Create a new AccountWatcher and the receiver for its status.
    ///
    /// # Arguments
    ///
    /// * `validator` - Validator used for every issued candidate
    /// * `quiet_period` - Time without input before a candidate is validated
    pub fn new(
        validator: AccountValidator<R>,
        quiet_period: Duration,
    ) -> (Self, watch::Receiver<AccountStatus>) {
        let (status_tx, status_rx) = watch::channel(AccountStatus::Idle);
        let watcher = Self {
            validator,
            quiet_period,
            status_tx,
        };
        (watcher, status_rx)
    }

    /// Additional receiver for the published status.
    pub fn subscribe(&self) -> watch::Receiver<AccountStatus> {
        self.status_tx.subscribe()
    }

    /// Run the AccountWatcher.
    ///
    /// Returns when shutdown is signalled, or once the input channel is
    /// closed and every outstanding validation has been answered.
    pub async fn run(self, mut input_rx: AccountInputReceiver, mut shutdown_rx: watch::Receiver<bool>) {
        let Self {
            validator,
            quiet_period,
            status_tx,
        } = self;
        let validator = &validator;

        let mut guard = StalenessGuard::new();
        let mut pending: Option<String> = None;
        let mut deadline = Instant::now();
        let mut input_open = true;
        let mut in_flight = FuturesUnordered::new();

        info!(quiet_ms = quiet_period.as_millis() as u64, "AccountWatcher started");

        loop {
            if !input_open && pending.is_none() && in_flight.is_empty() {
                debug!("Account input closed and drained");
                break;
            }

            tokio::select! {
                biased;

                // Check for shutdown
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("AccountWatcher received shutdown signal");
                        break;
                    }
                }

                // Raw input restarts the quiet period
                input = input_rx.recv(), if input_open => {
                    match input {
                        Some(raw) => {
                            // Whatever was resolved before no longer describes the field.
                            guard.clear();
                            let candidate = AccountName::sanitize(&raw);
                            if !candidate.is_empty() {
                                publish(&status_tx, AccountStatus::Checking(candidate));
                            }
                            pending = Some(raw);
                            deadline = Instant::now() + quiet_period;
                        }
                        None => input_open = false,
                    }
                }

                // Quiet period elapsed
                _ = tokio::time::sleep_until(deadline), if pending.is_some() => {
                    let raw = pending.take().unwrap_or_default();
                    let candidate = AccountName::sanitize(&raw);
                    if candidate.is_empty() {
                        guard.clear();
                        publish(&status_tx, AccountStatus::Idle);
                        continue;
                    }

                    let ticket = guard.issue(candidate.clone());
                    debug!(account = %candidate, seq = ticket.seq(), "Issuing account validation");
                    publish(&status_tx, AccountStatus::Checking(candidate));
                    in_flight.push(async move {
                        let result = validator.validate(ticket.candidate().clone()).await;
                        (ticket, result)
                    });
                }

                // A validation answered
                Some((ticket, result)) = in_flight.next(), if !in_flight.is_empty() => {
                    match guard.admit(&ticket, result) {
                        Some(result) => {
                            debug!(
                                account = %ticket.candidate(),
                                valid = result.is_valid(),
                                "Applying account validation"
                            );
                            publish(
                                &status_tx,
                                AccountStatus::Resolved {
                                    candidate: ticket.candidate().clone(),
                                    result,
                                },
                            );
                        }
                        None => {
                            debug!(
                                account = %ticket.candidate(),
                                seq = ticket.seq(),
                                "Discarding stale account validation"
                            );
                        }
                    }
                }
            }
        }

        info!("AccountWatcher shutdown complete");
    }
}

/// Notify subscribers only when the status actually changes.
fn publish(status_tx: &watch::Sender<AccountStatus>, status: AccountStatus) {
    status_tx.send_if_modified(|current| {
        if *current == status {
            return false;
        }
        *current = status;
        true
    });
}
