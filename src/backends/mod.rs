//! Key-value media the store actor can own.
//!
//! A medium holds opaque text under string keys and knows nothing about
//! collections or records. Everything above it talks to the medium through
//! [`KeyValueStore`], so tests swap in [`MemoryStore`] where the binary
//! uses [`FileStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::error::StoreError;

/// Text-in, text-out persistence with whole-value overwrite semantics.
pub trait KeyValueStore: Send + 'static {
    /// Returns `None` when the key was never written or has been deleted.
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Replaces any prior value under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Removes `key`. Deleting a missing key is not an error.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }
}
