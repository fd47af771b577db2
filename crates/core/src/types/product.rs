//! Catalog products as served by the remote inventory service.

use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::Price;

/// A catalog product.
///
/// The remote service owns this record. Clients fetch it fresh for every read
/// and never persist a copy. Optional text fields default to empty and a
/// missing stock count reads as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Price,
    /// Image URL or path.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub description: String,
    /// Shipping or fulfillment note shown on the detail page.
    #[serde(default)]
    pub fulfillment: String,
    /// Short product type line, e.g. "Hoodie · Unisex".
    #[serde(default)]
    pub type_line: String,
}

impl Product {
    /// Whether at least one unit can be added to a cart.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record_uses_defaults() {
        let product: Product =
            serde_json::from_str(r#"{"id":"p1","name":"Tee","price":10}"#).unwrap();
        assert_eq!(product.stock, 0);
        assert!(product.tags.is_empty());
        assert!(product.type_line.is_empty());
        assert!(!product.in_stock());
    }

    #[test]
    fn test_full_record() {
        let product: Product = serde_json::from_str(
            r#"{
                "id": "p2",
                "name": "Hoodie",
                "price": 49.5,
                "image": "/img/hoodie.png",
                "stock": 4,
                "tags": ["new", "LIMITED"],
                "description": "Warm",
                "fulfillment": "Ships in 2 days",
                "typeLine": "Hoodie"
            }"#,
        )
        .unwrap();
        assert!(product.in_stock());
        assert_eq!(product.price.to_string(), "$49.50");
        assert_eq!(product.type_line, "Hoodie");
        assert_eq!(product.tags, vec!["new", "LIMITED"]);
    }
}
