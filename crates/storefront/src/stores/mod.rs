//! Typed records over the storage port.
//!
//! - [`CartStore`] - cart line items pending checkout
//! - [`SalesLedger`] - cumulative units sold per product
//! - [`ReviewStore`] - per-product reviews and average rating

mod cart;
mod reviews;
mod sales;

pub use cart::CartStore;
pub use reviews::ReviewStore;
pub use sales::SalesLedger;
