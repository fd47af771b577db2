//! Unified error handling with Sentry integration.
//!
//! Component errors (`StorageError`, `ApiError`, `ConfigError`, ...) live next
//! to their components. `StorefrontError` unifies them for front ends.

use arcane_core::RatingError;
use thiserror::Error;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::storage::StorageError;
use crate::views::UnknownSize;

/// Error type for front ends driving the storefront.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Local state could not be written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration is invalid.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The remote client could not be built or used.
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Rating outside 1..=5.
    #[error("Invalid rating: {0}")]
    Rating(#[from] RatingError),

    /// Size outside the option set.
    #[error("Invalid size: {0}")]
    Size(#[from] UnknownSize),

    /// Requested product does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Checkout was refused, or accepted without local state being saved.
    #[error("{0}")]
    Checkout(String),
}

impl StorefrontError {
    /// Log the error, capturing it to Sentry unless it was caused by user
    /// input.
    pub fn report(&self) {
        if matches!(self, Self::Storage(_) | Self::Api(_)) {
            let event_id = sentry::capture_error(self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Storefront error"
            );
        } else {
            tracing::error!(error = %self, "Command failed");
        }
    }
}

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "p1"), ("size", "S")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
