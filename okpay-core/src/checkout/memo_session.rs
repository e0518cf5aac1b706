use crate::storage::KeyValueStore;
use okpay_sdk::objects::Memo;
use tracing::{debug, info, warn};

/// Key the session memo is stored under.
pub const MEMO_KEY: &str = "okpay_memo";

/// The memo shared by every transfer of one session.
pub struct MemoSession<S> {
    store: S,
}

impl<S: KeyValueStore> MemoSession<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Return the persisted memo, generating and persisting one if none is
    /// stored or the stored value is not a memo.
    ///
    /// Storage failures are logged; the memo returned is then only good for
    /// this process.
    pub fn load_or_generate(&self) -> Memo {
        match self.store.get_item(MEMO_KEY) {
            Ok(Some(stored)) => match Memo::parse(&stored) {
                Some(memo) => {
                    debug!(memo = %memo, "Reusing session memo");
                    return memo;
                }
                None => warn!(stored = %stored, "Discarding malformed session memo"),
            },
            Ok(None) => {}
            Err(e) => warn!(error = %e, "Failed to read session memo"),
        }
        self.start_new()
    }

    /// Forget the current memo and start a new session.
    pub fn reset(&self) -> Memo {
        if let Err(e) = self.store.remove_item(MEMO_KEY) {
            warn!(error = %e, "Failed to remove session memo");
        }
        self.start_new()
    }

    fn start_new(&self) -> Memo {
        let memo = Memo::generate();
        match self.store.set_item(MEMO_KEY, memo.as_str()) {
            Ok(()) => info!(memo = %memo, "Started new payment session"),
            Err(e) => warn!(error = %e, "Failed to persist session memo"),
        }
        memo
    }
}
