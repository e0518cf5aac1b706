//! Long-running processors.
//!
//! - `AccountWatcher`: receives raw recipient input, publishes `AccountStatus`

pub mod account_watcher;

pub use account_watcher::{
    AccountInputReceiver, AccountInputSender, AccountStatus, AccountWatcher,
    account_input_channel,
};
