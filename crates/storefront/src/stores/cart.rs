//! Persisted shopping cart.

use std::sync::Arc;

use arcane_core::{CartLineItem, ProductId, VariantKey};

use crate::storage::{CART_KEY, KeyValueStore, StorageError, load_or_default, save};

/// Ordered collection of cart line items kept in the storage port.
///
/// Every operation reads the whole cart, changes it and writes it back whole.
/// At most one line exists per (product, size) pair and every quantity is at
/// least one. Concurrent writers are not coordinated: the last write wins.
pub struct CartStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CartStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> CartStore<S> {
    /// Create a cart over the given store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Current line items in insertion order.
    ///
    /// A record written by something else that repeats a (product, size) pair
    /// is folded into its first occurrence.
    pub fn read(&self) -> Vec<CartLineItem> {
        let stored: Vec<CartLineItem> = load_or_default(&*self.store, CART_KEY);
        stored.into_iter().fold(Vec::new(), |mut lines, item| {
            merge_into(&mut lines, item);
            lines
        })
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Add a line, summing quantities with an existing line for the same pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn add(&self, item: CartLineItem) -> Result<(), StorageError> {
        let mut lines = self.read();
        merge_into(&mut lines, item);
        self.write(&lines)
    }

    /// Remove the line for a pair. Does nothing if the pair is not in the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn remove(&self, id: &ProductId, size: &VariantKey) -> Result<(), StorageError> {
        let mut lines = self.read();
        let before = lines.len();
        lines.retain(|line| !line.matches(id, size));
        if lines.len() == before {
            return Ok(());
        }
        self.write(&lines)
    }

    /// Add one unit to the line for a pair. Does nothing if the pair is not in
    /// the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn increment_quantity(&self, id: &ProductId, size: &VariantKey) -> Result<(), StorageError> {
        let mut lines = self.read();
        let Some(line) = lines.iter_mut().find(|line| line.matches(id, size)) else {
            return Ok(());
        };
        line.qty = line.qty.saturating_add(1);
        self.write(&lines)
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.write(&[])
    }

    fn write(&self, lines: &[CartLineItem]) -> Result<(), StorageError> {
        save(&*self.store, CART_KEY, lines).inspect_err(|e| {
            tracing::error!(error = %e, "Failed to persist cart");
        })
    }
}

fn merge_into(lines: &mut Vec<CartLineItem>, item: CartLineItem) {
    match lines.iter_mut().find(|line| line.matches(&item.id, &item.size)) {
        Some(line) => line.qty = line.qty.saturating_add(item.qty.get()),
        None => lines.push(item),
    }
}
