//! Storage port for locally persisted records.
//!
//! # Architecture
//!
//! Every locally persisted record (cart, sales ledger, reviews) lives behind
//! the [`KeyValueStore`] capability: get, set and clear a string value by key.
//! Records are stored whole as JSON and rewritten whole on every change.
//!
//! # Keys
//!
//! The schema version is part of the key. Changing a record's format means
//! bumping the key, which yields a fresh empty record instead of a migration.
//!
//! - `arcane_cart_v1` - ordered cart line items
//! - `arcane_sales_v1` - product id to cumulative units sold
//! - `arcane_reviews_v1_<product id>` - reviews for one product, newest first
//!
//! # Concurrency
//!
//! There is no locking. Two writers (two open pages, two CLI processes) that
//! interleave read-modify-write cycles race, and the last write wins.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Key of the persisted cart.
pub const CART_KEY: &str = "arcane_cart_v1";

/// Key of the persisted sales ledger.
pub const SALES_KEY: &str = "arcane_sales_v1";

/// Prefix of the per-product review keys.
pub const REVIEWS_KEY_PREFIX: &str = "arcane_reviews_v1_";

/// Errors that can occur when writing persisted state.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record could not be encoded.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A small persistent key-value capability.
///
/// Reads never fail: a backend that cannot be read reports the key as absent.
/// Writes report their failure so callers can log it.
pub trait KeyValueStore {
    /// Get the value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear(&self, key: &str) -> Result<(), StorageError>;
}

/// Load a JSON record, falling back to its default when absent or malformed.
pub fn load_or_default<T, S>(store: &S, key: &str) -> T
where
    T: DeserializeOwned + Default,
    S: KeyValueStore + ?Sized,
{
    let Some(raw) = store.get(key) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!(key, error = %e, "Discarding malformed persisted record");
            T::default()
        }
    }
}

/// Save a record as JSON.
///
/// # Errors
///
/// Returns an error if the record cannot be encoded or the store write fails.
pub fn save<T, S>(store: &S, key: &str, value: &T) -> Result<(), StorageError>
where
    T: Serialize + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn test_missing_key_loads_default() {
        let store = MemoryStore::new();
        let value: Vec<String> = load_or_default(&store, "nothing");
        assert!(value.is_empty());
    }

    #[test]
    fn test_malformed_record_loads_default() {
        let store = MemoryStore::new();
        store.set(SALES_KEY, "{not json").unwrap();
        let value: BTreeMap<String, u64> = load_or_default(&store, SALES_KEY);
        assert!(value.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = MemoryStore::new();
        save(&store, "k", &vec![1, 2, 3]).unwrap();
        let value: Vec<i32> = load_or_default(&store, "k");
        assert_eq!(value, [1, 2, 3]);
        assert_eq!(store.get("k").as_deref(), Some("[1,2,3]"));
    }
}
