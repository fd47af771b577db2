//! View controllers.
//!
//! Every render produces a fresh view model. Controls are value-typed commands
//! carried inside it, so nothing accumulates across renders.

mod analytics;
mod cart;
mod gallery;
mod product;
mod reviews;

pub use analytics::{
    AVG_RATING_LABEL, AnalyticsDatasets, AnalyticsView, Axis, ChartBackend, ChartCanvas,
    ChartConfig, ChartData, ChartOptions, Dataset, STOCK_LABEL, Scales, UNITS_SOLD_LABEL,
    build_datasets,
};
pub use cart::{
    CartBody, CartCommand, CartLineView, CartOverlay, CartView, EMPTY_CART_MESSAGE, HydratedLine,
    hydrate,
};
pub use gallery::{
    CardActivation, CardTarget, EMPTY_GALLERY_MESSAGE, Gallery, GalleryView, ProductCard,
    detail_href,
};
pub use product::{
    DetailLoad, PRODUCT_NOT_FOUND_MESSAGE, ProductDetail, ProductDetailView, SizeSelector,
    UnknownSize, product_id_from_address,
};
pub use reviews::{ReviewCard, ReviewSubmission, ReviewSummary, ReviewsPanel, ReviewsSection};

/// "1 review", "2 reviews".
pub(crate) fn pluralize(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}
