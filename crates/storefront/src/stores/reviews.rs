//! Persisted product reviews.

use std::sync::Arc;

use arcane_core::{ProductId, Rating, ReviewEntry, average_rating};
use chrono::{DateTime, Utc};

use crate::storage::{KeyValueStore, REVIEWS_KEY_PREFIX, StorageError, load_or_default, save};

/// Append-only reviews, one record per product, newest first.
pub struct ReviewStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for ReviewStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

fn reviews_key(id: &ProductId) -> String {
    format!("{REVIEWS_KEY_PREFIX}{id}")
}

impl<S: KeyValueStore + ?Sized> ReviewStore<S> {
    /// Create a review store over the given store.
    pub const fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Reviews for a product, newest first.
    pub fn reviews(&self, id: &ProductId) -> Vec<ReviewEntry> {
        load_or_default(&*self.store, &reviews_key(id))
    }

    /// Submit a review stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the reviews cannot be written.
    pub fn submit(
        &self,
        id: &ProductId,
        rating: Rating,
        comment: &str,
    ) -> Result<ReviewEntry, StorageError> {
        self.submit_at(id, rating, comment, Utc::now())
    }

    /// Submit a review with an explicit timestamp. The comment is trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if the reviews cannot be written.
    pub fn submit_at(
        &self,
        id: &ProductId,
        rating: Rating,
        comment: &str,
        created_at: DateTime<Utc>,
    ) -> Result<ReviewEntry, StorageError> {
        let entry = ReviewEntry {
            rating,
            comment: comment.trim().to_owned(),
            created_at,
        };

        let mut reviews = self.reviews(id);
        reviews.insert(0, entry.clone());
        save(&*self.store, &reviews_key(id), &reviews).inspect_err(|e| {
            tracing::error!(product_id = %id, error = %e, "Failed to persist review");
        })?;

        Ok(entry)
    }

    /// Mean rating for a product, 0 when it has no reviews.
    pub fn average_rating(&self, id: &ProductId) -> f64 {
        average_rating(&self.reviews(id))
    }
}
