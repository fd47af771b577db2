//! Arcane Core - Shared domain types.
//!
//! This crate provides the types shared by every Arcane component:
//! - `storefront` - Cart, catalog, checkout and analytics engine
//! - `cli` - Command-line front end
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Keys, prices, cart lines, products, reviews and tag classification

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
