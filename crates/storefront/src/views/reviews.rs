//! Review list, summary and submission form on the product page.

use arcane_core::{ProductId, Rating, ReviewEntry, average_rating, rounded_stars};

use crate::storage::{KeyValueStore, StorageError};
use crate::stores::ReviewStore;
use crate::views::pluralize;

const RATING_PROMPT: &str = "Select a rating";

/// Average, star count and review count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    /// Mean rating with one decimal, e.g. "4.0".
    pub average: String,
    /// Whole stars out of five.
    pub stars: u8,
    /// "N review(s)".
    pub count_label: String,
}

impl ReviewSummary {
    fn of(reviews: &[ReviewEntry]) -> Self {
        let average = average_rating(reviews);
        Self {
            average: format!("{average:.1}"),
            stars: rounded_stars(average),
            count_label: pluralize(reviews.len(), "review"),
        }
    }
}

/// One displayed review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewCard {
    pub stars: u8,
    /// Submission date, e.g. "Mar 4, 2025".
    pub date: String,
    pub comment: String,
}

impl From<&ReviewEntry> for ReviewCard {
    fn from(entry: &ReviewEntry) -> Self {
        Self {
            stars: entry.rating.stars(),
            date: entry.created_at.format("%b %-d, %Y").to_string(),
            comment: entry.comment.clone(),
        }
    }
}

/// Rendered reviews section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewsSection {
    pub summary: ReviewSummary,
    /// Newest first. Empty means the empty-state note is shown.
    pub reviews: Vec<ReviewCard>,
}

impl ReviewsSection {
    /// Whether the empty-state note is shown.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }
}

/// What a form submission did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewSubmission {
    /// No rating was picked; the error is shown and nothing is stored.
    MissingRating,
    Stored(ReviewEntry),
}

/// Reviews panel controller for one product.
pub struct ReviewsPanel<S: ?Sized> {
    product: ProductId,
    store: ReviewStore<S>,
    rating: Option<Rating>,
    comment: String,
    error_visible: bool,
    rendered: ReviewsSection,
}

impl<S: KeyValueStore + ?Sized> ReviewsPanel<S> {
    /// Create the panel and render the stored reviews.
    pub fn new(product: ProductId, store: ReviewStore<S>) -> Self {
        let rendered = ReviewsSection {
            summary: ReviewSummary::of(&[]),
            reviews: Vec::new(),
        };
        let mut panel = Self {
            product,
            store,
            rating: None,
            comment: String::new(),
            error_visible: false,
            rendered,
        };
        panel.render();
        panel
    }

    /// Rebuild the section from the store.
    pub fn render(&mut self) -> &ReviewsSection {
        let reviews = self.store.reviews(&self.product);
        self.rendered = ReviewsSection {
            summary: ReviewSummary::of(&reviews),
            reviews: reviews.iter().map(ReviewCard::from).collect(),
        };
        &self.rendered
    }

    /// The last rendered section.
    pub const fn section(&self) -> &ReviewsSection {
        &self.rendered
    }

    /// Pick a rating.
    pub const fn select_rating(&mut self, rating: Rating) {
        self.rating = Some(rating);
    }

    pub fn set_comment(&mut self, comment: impl Into<String>) {
        self.comment = comment.into();
    }

    pub const fn selected_rating(&self) -> Option<Rating> {
        self.rating
    }

    pub fn comment(&self) -> &str {
        &self.comment
    }

    /// Whether the "pick a rating" error is showing.
    pub const fn error_visible(&self) -> bool {
        self.error_visible
    }

    /// Hint next to the rating picker.
    pub fn rating_hint(&self) -> String {
        self.rating.map_or_else(
            || RATING_PROMPT.to_owned(),
            |rating| format!("You selected {}", pluralize(usize::from(rating.stars()), "star")),
        )
    }

    /// Submit the form.
    ///
    /// # Errors
    ///
    /// Returns an error if the review cannot be written. The form is left as
    /// it was so the shopper can retry.
    pub fn submit(&mut self) -> Result<ReviewSubmission, StorageError> {
        let Some(rating) = self.rating else {
            self.error_visible = true;
            return Ok(ReviewSubmission::MissingRating);
        };
        self.error_visible = false;

        let entry = self.store.submit(&self.product, rating, &self.comment)?;
        tracing::info!(product_id = %self.product, rating = rating.stars(), "Review submitted");

        self.rating = None;
        self.comment.clear();
        self.render();
        Ok(ReviewSubmission::Stored(entry))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::storage::MemoryStore;

    fn rating(stars: u8) -> Rating {
        Rating::try_from(stars).unwrap()
    }

    fn panel() -> (ReviewStore<MemoryStore>, ReviewsPanel<MemoryStore>) {
        let store = ReviewStore::new(Arc::new(MemoryStore::new()));
        (store.clone(), ReviewsPanel::new("p1".into(), store))
    }

    #[test]
    fn test_empty_panel() {
        let (_, panel) = panel();
        let section = panel.section();

        assert!(section.is_empty());
        assert_eq!(section.summary.average, "0.0");
        assert_eq!(section.summary.stars, 0);
        assert_eq!(section.summary.count_label, "0 reviews");
        assert_eq!(panel.rating_hint(), "Select a rating");
    }

    #[test]
    fn test_summary_of_existing_reviews() {
        let (store, _) = panel();
        for stars in [5, 3, 4] {
            store.submit(&"p1".into(), rating(stars), "").unwrap();
        }

        let panel = ReviewsPanel::new("p1".into(), store);
        let summary = &panel.section().summary;

        assert_eq!(summary.average, "4.0");
        assert_eq!(summary.stars, 4);
        assert_eq!(summary.count_label, "3 reviews");
    }

    #[test]
    fn test_card_fields() {
        let (store, _) = panel();
        let created_at = Utc.with_ymd_and_hms(2025, 3, 4, 12, 0, 0).unwrap();
        store
            .submit_at(&"p1".into(), rating(2), " meh ", created_at)
            .unwrap();

        let panel = ReviewsPanel::new("p1".into(), store);
        let card = &panel.section().reviews[0];

        assert_eq!(card.stars, 2);
        assert_eq!(card.date, "Mar 4, 2025");
        assert_eq!(card.comment, "meh");
        assert_eq!(panel.section().summary.count_label, "1 review");
    }

    #[test]
    fn test_submit_without_rating_stores_nothing() {
        let (store, mut panel) = panel();
        panel.set_comment("great");

        let outcome = panel.submit().unwrap();

        assert_eq!(outcome, ReviewSubmission::MissingRating);
        assert!(panel.error_visible());
        assert!(store.reviews(&"p1".into()).is_empty());
        assert_eq!(panel.comment(), "great");
    }

    #[test]
    fn test_submit_stores_resets_and_rerenders() {
        let (store, mut panel) = panel();
        panel.submit().unwrap();
        assert!(panel.error_visible());

        panel.select_rating(rating(1));
        assert_eq!(panel.rating_hint(), "You selected 1 star");
        panel.select_rating(rating(5));
        assert_eq!(panel.rating_hint(), "You selected 5 stars");
        panel.set_comment("  Love it  ");

        let outcome = panel.submit().unwrap();

        assert!(matches!(outcome, ReviewSubmission::Stored(ref entry) if entry.comment == "Love it"));
        assert!(!panel.error_visible());
        assert_eq!(panel.selected_rating(), None);
        assert_eq!(panel.comment(), "");
        assert_eq!(panel.rating_hint(), "Select a rating");
        assert_eq!(panel.section().reviews.len(), 1);
        assert_eq!(panel.section().summary.average, "5.0");
        assert_eq!(store.reviews(&"p1".into()).len(), 1);
    }

    #[test]
    fn test_newest_review_first() {
        let (_, mut panel) = panel();
        panel.select_rating(rating(3));
        panel.set_comment("first");
        panel.submit().unwrap();
        panel.select_rating(rating(4));
        panel.set_comment("second");
        panel.submit().unwrap();

        let comments: Vec<_> = panel
            .section()
            .reviews
            .iter()
            .map(|card| card.comment.as_str())
            .collect();
        assert_eq!(comments, ["second", "first"]);
    }
}
