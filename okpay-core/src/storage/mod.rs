//! Key-value string stores backing the rate cache and the session memo.
//!
//! Both stores are synchronous. Callers above this module treat every
//! [`StoreError`] as a miss or a no-op; nothing here is fatal to a checkout.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use thiserror::Error;

/// Errors that can occur while reading or writing a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Filesystem error
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// Key cannot be mapped onto the backing storage
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),
}

/// A string store addressed by caller-built keys.
pub trait KeyValueStore: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;

    fn remove_item(&self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        (**self).remove_item(key)
    }
}
