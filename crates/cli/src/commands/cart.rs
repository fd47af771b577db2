//! Cart and checkout commands.

use arcane_storefront::checkout::{CHECKOUT_SUCCESS_MESSAGE, CheckoutOutcome};
use arcane_storefront::controller::NoCharts;
use arcane_storefront::error::StorefrontError;
use arcane_storefront::views::{CartCommand, EMPTY_CART_MESSAGE};

use super::Context;
use crate::render;

/// Which line command `arcane cart` runs.
#[derive(Debug, Clone, Copy)]
pub enum LineCommand {
    Remove,
    Increment,
}

/// `arcane add <ID> [--size]`
pub async fn add(ctx: &Context, id: &str, size: &str) -> Result<(), StorefrontError> {
    let page = ctx.product_page(id)?;
    let mut storefront = ctx.open::<NoCharts>(&page, None).await;

    if storefront.notice().is_some() {
        return Err(StorefrontError::NotFound(id.to_owned()));
    }

    storefront.select_size(size)?;
    if !storefront.add_detail_to_cart().await? {
        render::message("Out of stock.");
        return Ok(());
    }

    if let Some(cart) = &storefront.views().cart {
        render::cart(cart.overlay());
    }
    Ok(())
}

/// `arcane cart [show]`
pub async fn cart_show(ctx: &Context) -> Result<(), StorefrontError> {
    let page = ctx.cart_page()?;
    let storefront = ctx.open::<NoCharts>(&page, None).await;

    if let Some(cart) = &storefront.views().cart {
        render::cart(cart.overlay());
    }
    Ok(())
}

/// `arcane cart remove|inc <ID> [--size]`
pub async fn cart_command(
    ctx: &Context,
    command: LineCommand,
    id: &str,
    size: &str,
) -> Result<(), StorefrontError> {
    let page = ctx.cart_page()?;
    let mut storefront = ctx.open::<NoCharts>(&page, None).await;

    let (id, size) = (id.into(), size.into());
    let command = match command {
        LineCommand::Remove => CartCommand::Remove { id, size },
        LineCommand::Increment => CartCommand::Increment { id, size },
    };

    if let Some(overlay) = storefront.dispatch_cart(&command).await? {
        render::cart(overlay);
    }
    Ok(())
}

/// `arcane checkout`
pub async fn checkout(ctx: &Context) -> Result<(), StorefrontError> {
    let page = ctx.cart_page()?;
    let mut storefront = ctx.open::<NoCharts>(&page, None).await;

    let outcome = storefront.checkout().await;
    if let Some(message) = settle(outcome)? {
        render::message(message);
    }
    Ok(())
}

/// What to print for a checkout outcome. Refused and unsettled orders are
/// errors so the process exits non-zero.
fn settle(outcome: CheckoutOutcome) -> Result<Option<&'static str>, StorefrontError> {
    match outcome {
        CheckoutOutcome::EmptyCart => Ok(Some(EMPTY_CART_MESSAGE)),
        CheckoutOutcome::Busy => Ok(None),
        CheckoutOutcome::Completed { .. } => Ok(Some(CHECKOUT_SUCCESS_MESSAGE)),
        CheckoutOutcome::Failed { message } | CheckoutOutcome::Unsettled { message, .. } => {
            Err(StorefrontError::Checkout(message))
        }
    }
}
