//! Arcane storefront library.
//!
//! Keeps a locally persisted cart consistent across independently initialized
//! pages, hydrates it against the remote catalog, runs all-or-nothing
//! checkouts and pushes the result into every active view.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod checkout;
pub mod config;
pub mod controller;
pub mod error;
pub mod storage;
pub mod stores;
pub mod views;

#[cfg(test)]
mod testing;
