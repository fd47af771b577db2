//! Product reviews and star ratings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Highest star rating.
pub const MAX_STARS: u8 = 5;

/// Error for ratings outside 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("rating must be between 1 and {MAX_STARS}, got {0}")]
pub struct RatingError(pub u8);

/// A whole-star rating from 1 to 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Number of stars.
    #[must_use]
    pub const fn stars(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = RatingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if (1..=MAX_STARS).contains(&value) {
            Ok(Self(value))
        } else {
            Err(RatingError(value))
        }
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// A submitted review. Reviews are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewEntry {
    pub rating: Rating,
    /// Free text, possibly empty.
    #[serde(default)]
    pub comment: String,
    /// Submission time, persisted as epoch milliseconds.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
}

/// Arithmetic mean of the ratings, or 0 when there are none.
#[must_use]
pub fn average_rating(reviews: &[ReviewEntry]) -> f64 {
    if reviews.is_empty() {
        return 0.0;
    }
    let sum: u32 = reviews.iter().map(|r| u32::from(r.rating.stars())).sum();
    #[allow(clippy::cast_precision_loss)] // review counts never approach f64 precision
    let count = reviews.len() as f64;
    f64::from(sum) / count
}

/// Average rounded to the nearest whole star, clamped to 0..=5.
#[must_use]
pub fn rounded_stars(average: f64) -> u8 {
    let clamped = average.round().clamp(0.0, f64::from(MAX_STARS));
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // clamped to 0..=5
    let stars = clamped as u8;
    stars
}
