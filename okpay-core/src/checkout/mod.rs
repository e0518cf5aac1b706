//! Checkout application state.
//!
//! [`CheckoutSession`] is the single owner of everything a payment request
//! accumulates before submission: the session memo, the rate snapshot, the
//! currency mode, the synchronized amounts and the last applied recipient
//! status.

mod amounts;
mod memo_session;
mod session;

pub use amounts::{AmountPair, round_cents};
pub use memo_session::{MEMO_KEY, MemoSession};
pub use session::{CheckoutError, CheckoutSession, DisplayAmounts};
