//! Cart line items as persisted locally and submitted at checkout.

use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantKey};

/// One (product, size, quantity) entry in the shopper's cart.
///
/// Field names match the persisted and checkout wire format:
/// `{"id": "p1", "size": "S", "qty": 2}`. The quantity is non-zero by
/// construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLineItem {
    /// Product being ordered.
    pub id: ProductId,
    /// Selected size.
    pub size: VariantKey,
    /// Number of units.
    pub qty: NonZeroU32,
}

impl CartLineItem {
    /// Create a line item.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, size: impl Into<VariantKey>, qty: NonZeroU32) -> Self {
        Self {
            id: id.into(),
            size: size.into(),
            qty,
        }
    }

    /// A single unit of a product in the given size.
    #[must_use]
    pub fn single(id: impl Into<ProductId>, size: impl Into<VariantKey>) -> Self {
        Self::new(id, size, NonZeroU32::MIN)
    }

    /// Whether this line refers to the given (product, size) pair.
    #[must_use]
    pub fn matches(&self, id: &ProductId, size: &VariantKey) -> bool {
        self.id == *id && self.size == *size
    }
}
