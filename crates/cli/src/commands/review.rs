//! Review submission.

use arcane_core::Rating;
use arcane_storefront::controller::NoCharts;
use arcane_storefront::error::StorefrontError;
use arcane_storefront::views::ReviewSubmission;

use super::Context;
use crate::render;

/// `arcane review <ID> --rating N [--comment]`
pub async fn review(
    ctx: &Context,
    id: &str,
    rating: u8,
    comment: &str,
) -> Result<(), StorefrontError> {
    let rating = Rating::try_from(rating)?;
    let page = ctx.product_page(id)?;
    let mut storefront = ctx.open::<NoCharts>(&page, None).await;

    if storefront.notice().is_some() {
        return Err(StorefrontError::NotFound(id.to_owned()));
    }
    let Some(panel) = storefront.reviews_mut() else {
        return Err(StorefrontError::NotFound(id.to_owned()));
    };

    panel.select_rating(rating);
    panel.set_comment(comment);
    if let ReviewSubmission::Stored(_) = panel.submit()? {
        render::message("Review saved.");
        render::reviews(panel.section());
    }
    Ok(())
}
