//! Persisted cumulative sales counter.

use std::collections::BTreeMap;
use std::sync::Arc;

use arcane_core::{CartLineItem, ProductId};

use crate::storage::{KeyValueStore, SALES_KEY, StorageError, load_or_default, save};

/// Units sold per product, advanced only by confirmed checkouts.
///
/// Entries appear on a product's first sale and are never decreased or removed.
pub struct SalesLedger<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SalesLedger<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> SalesLedger<S> {
    /// Create a ledger over the given store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// The whole ledger.
    pub fn read(&self) -> BTreeMap<ProductId, u64> {
        load_or_default(&*self.store, SALES_KEY)
    }

    /// Units sold for one product, 0 if it never sold.
    pub fn units_sold(&self, id: &ProductId) -> u64 {
        self.read().get(id).copied().unwrap_or(0)
    }

    /// Add the quantities of a completed checkout.
    ///
    /// Lines with a blank product id are skipped. Ids are trimmed before use.
    ///
    /// # Errors
    ///
    /// Returns an error if the ledger cannot be written.
    pub fn record_checkout(&self, items: &[CartLineItem]) -> Result<(), StorageError> {
        let mut sales = self.read();
        for item in items {
            if item.id.is_blank() {
                tracing::debug!("Skipping sale with blank product id");
                continue;
            }
            let units = sales
                .entry(ProductId::new(item.id.as_str().trim()))
                .or_insert(0);
            *units = units.saturating_add(u64::from(item.qty.get()));
        }

        save(&*self.store, SALES_KEY, &sales).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist sales ledger");
        })
    }
}
