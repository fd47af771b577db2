//! Core types for the Arcane storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod review;
pub mod tag;

pub use cart::CartLineItem;
pub use id::*;
pub use price::{NegativePrice, Price};
pub use product::Product;
pub use review::{MAX_STARS, Rating, RatingError, ReviewEntry, average_rating, rounded_stars};
pub use tag::{TagBadge, TagMarker, TagSurface, classify_tags};
