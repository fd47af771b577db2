//! Remote inventory service: catalog reads and checkout.
//!
//! # Architecture
//!
//! - The remote service is the source of truth for products and stock
//! - No local caching: every read goes back to the service
//! - Catalog reads never fail. Errors are logged and degrade to an empty list
//!   or an absent product, which every caller treats as "skip"
//! - Checkout is the one call whose failure is reported, because its message
//!   is shown to the shopper
//!
//! # Endpoints
//!
//! ```text
//! GET  /api/products        - JSON array of products
//! GET  /api/products/{id}   - One product, or a not-found status
//! POST /api/checkout        - {"items": [{"id", "size", "qty"}]}
//! ```

mod http;

pub use http::HttpStoreClient;

use std::future::Future;

use arcane_core::{CartLineItem, Product, ProductId};
use serde::Serialize;
use thiserror::Error;

/// Message shown when a failed checkout carries no message of its own.
pub const CHECKOUT_FALLBACK_MESSAGE: &str = "Checkout failed. Please check stock and try again.";

/// Errors that can occur when talking to the remote service.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Unexpected status {status}")]
    Status { status: u16 },

    /// Request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Response body could not be decoded.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Errors returned by a checkout submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The service refused the order (e.g. insufficient stock).
    #[error("Checkout rejected with status {status}: {}", .message.as_deref().unwrap_or("(no message)"))]
    Rejected {
        status: u16,
        /// The service's `error` field, verbatim.
        message: Option<String>,
    },

    /// The service could not be reached.
    #[error("Checkout unavailable: {0}")]
    Unavailable(#[from] ApiError),
}

impl CheckoutError {
    /// Text to show the shopper.
    #[must_use]
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected {
                message: Some(message),
                ..
            } if !message.is_empty() => message,
            _ => CHECKOUT_FALLBACK_MESSAGE,
        }
    }
}

/// Body of a checkout request.
#[derive(Debug, Serialize)]
pub struct CheckoutRequest<'a> {
    pub items: &'a [CartLineItem],
}

/// Reconciliation payload of a successful checkout. Its schema belongs to the
/// remote service, so it is kept as raw JSON.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutReceipt(pub serde_json::Value);

/// Read access to the remote catalog.
pub trait ProductCatalog {
    /// All products, or an empty list if the catalog cannot be fetched.
    fn list_products(&self) -> impl Future<Output = Vec<Product>>;

    /// One product, or `None` if it is missing or cannot be fetched.
    fn get_product(&self, id: &ProductId) -> impl Future<Output = Option<Product>>;
}

/// Submits orders to the remote service.
pub trait CheckoutGateway {
    /// Submit every line as one batch. The service checks and decrements stock.
    fn submit_checkout(
        &self,
        items: &[CartLineItem],
    ) -> impl Future<Output = Result<CheckoutReceipt, CheckoutError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_message_is_verbatim() {
        let err = CheckoutError::Rejected {
            status: 409,
            message: Some("Not enough stock for Hoodie (S)".to_string()),
        };
        assert_eq!(err.user_message(), "Not enough stock for Hoodie (S)");
    }

    #[test]
    fn test_missing_or_empty_message_falls_back() {
        let missing = CheckoutError::Rejected {
            status: 500,
            message: None,
        };
        let empty = CheckoutError::Rejected {
            status: 400,
            message: Some(String::new()),
        };
        let unreachable = CheckoutError::Unavailable(ApiError::Status { status: 502 });

        assert_eq!(missing.user_message(), CHECKOUT_FALLBACK_MESSAGE);
        assert_eq!(empty.user_message(), CHECKOUT_FALLBACK_MESSAGE);
        assert_eq!(unreachable.user_message(), CHECKOUT_FALLBACK_MESSAGE);
    }

    #[test]
    fn test_request_wire_format() {
        let items = [CartLineItem::single("p1", "S")];
        let json = serde_json::to_value(CheckoutRequest { items: &items }).unwrap_or_default();
        assert_eq!(
            json,
            serde_json::json!({"items": [{"id": "p1", "size": "S", "qty": 1}]})
        );
    }

    #[test]
    fn test_error_display() {
        let err = CheckoutError::Rejected {
            status: 409,
            message: None,
        };
        assert_eq!(err.to_string(), "Checkout rejected with status 409: (no message)");
    }
}
