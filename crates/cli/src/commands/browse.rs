//! Catalog browsing commands.

use arcane_storefront::controller::{NoCharts, PageAnchors};
use arcane_storefront::error::StorefrontError;

use super::Context;
use crate::charts::TableCharts;
use crate::render;

/// `arcane gallery`
pub async fn gallery(ctx: &Context) -> Result<(), StorefrontError> {
    let page = ctx.page(
        "index.html",
        PageAnchors {
            gallery: true,
            ..PageAnchors::default()
        },
    )?;
    let storefront = ctx.open::<NoCharts>(&page, None).await;

    if let Some(gallery) = &storefront.views().gallery {
        render::gallery(gallery.gallery());
    }
    Ok(())
}

/// `arcane product <ID>`
pub async fn product(ctx: &Context, id: &str) -> Result<(), StorefrontError> {
    let page = ctx.product_page(id)?;
    let storefront = ctx.open::<NoCharts>(&page, None).await;

    if let Some(notice) = storefront.notice() {
        render::message(notice);
        return Err(StorefrontError::NotFound(id.to_owned()));
    }

    let views = storefront.views();
    if let Some(detail) = &views.detail {
        render::detail(detail.detail(), detail.sizes());
    }
    if let Some(reviews) = &views.reviews {
        render::message("");
        render::reviews(reviews.section());
    }
    Ok(())
}

/// `arcane charts`
pub async fn charts(ctx: &Context) -> Result<(), StorefrontError> {
    let page = ctx.page(
        "index.html",
        PageAnchors {
            charts: true,
            ..PageAnchors::default()
        },
    )?;
    ctx.open(&page, Some(TableCharts::default())).await;
    Ok(())
}
