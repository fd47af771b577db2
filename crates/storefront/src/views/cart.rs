//! Cart overlay.
//!
//! Every render reads the cart, looks up all of its products concurrently and
//! builds a fresh overlay from the joined results. Lines whose product cannot
//! be fetched are left out of the overlay and its total but stay in the cart.

use std::sync::Arc;

use arcane_core::{CartLineItem, Price, Product, ProductId, VariantKey};
use futures::future::join_all;
use tracing::debug;

use crate::api::ProductCatalog;
use crate::checkout::CheckoutButton;
use crate::storage::{KeyValueStore, StorageError};
use crate::stores::CartStore;

/// Placeholder shown for an empty cart.
pub const EMPTY_CART_MESSAGE: &str = "Your cart is empty.";

/// A cart line joined with its product. Exists only while rendering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HydratedLine {
    pub item: CartLineItem,
    pub product: Product,
}

impl HydratedLine {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.item.qty.get())
    }
}

/// Resolve every cart line against the catalog.
///
/// All lookups run concurrently and are joined before returning, so the wait
/// is bounded by the slowest lookup. Unresolved lines are dropped from the
/// result; the cart itself is not touched.
pub async fn hydrate<C: ProductCatalog>(lines: Vec<CartLineItem>, catalog: &C) -> Vec<HydratedLine> {
    let products = join_all(lines.iter().map(|line| catalog.get_product(&line.id))).await;

    let requested = lines.len();
    let hydrated: Vec<_> = lines
        .into_iter()
        .zip(products)
        .filter_map(|(item, product)| product.map(|product| HydratedLine { item, product }))
        .collect();

    if hydrated.len() < requested {
        debug!(
            requested,
            resolved = hydrated.len(),
            "Some cart lines could not be resolved and are hidden"
        );
    }
    hydrated
}

/// A mutation a cart line offers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartCommand {
    Remove { id: ProductId, size: VariantKey },
    Increment { id: ProductId, size: VariantKey },
}

/// One displayed cart line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    pub id: ProductId,
    pub size: VariantKey,
    pub name: String,
    pub image: String,
    pub price: String,
    pub quantity: u32,
    pub line_total: String,
    pub remove: CartCommand,
    pub increment: CartCommand,
}

impl From<&HydratedLine> for CartLineView {
    fn from(line: &HydratedLine) -> Self {
        let id = line.item.id.clone();
        let size = line.item.size.clone();
        Self {
            name: line.product.name.clone(),
            image: line.product.image.clone(),
            price: line.product.price.to_string(),
            quantity: line.item.qty.get(),
            line_total: line.line_total().to_string(),
            remove: CartCommand::Remove {
                id: id.clone(),
                size: size.clone(),
            },
            increment: CartCommand::Increment {
                id: id.clone(),
                size: size.clone(),
            },
            id,
            size,
        }
    }
}

/// Overlay body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartBody {
    Empty { message: &'static str },
    Lines(Vec<CartLineView>),
}

/// A rendered cart overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartOverlay {
    pub body: CartBody,
    pub total: String,
    pub checkout_enabled: bool,
}

impl CartOverlay {
    /// The empty-cart overlay.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            body: CartBody::Empty {
                message: EMPTY_CART_MESSAGE,
            },
            total: Price::ZERO.to_string(),
            checkout_enabled: false,
        }
    }

    /// Displayed lines, empty for the placeholder.
    #[must_use]
    pub fn lines(&self) -> &[CartLineView] {
        match &self.body {
            CartBody::Empty { .. } => &[],
            CartBody::Lines(lines) => lines,
        }
    }
}

/// Cart overlay controller.
pub struct CartView<S: ?Sized, C> {
    cart: CartStore<S>,
    catalog: C,
    button: Arc<CheckoutButton>,
    rendered: CartOverlay,
    open: bool,
}

impl<S, C> CartView<S, C>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog,
{
    /// Create the overlay, closed and not yet rendered.
    pub fn new(cart: CartStore<S>, catalog: C, button: Arc<CheckoutButton>) -> Self {
        Self {
            cart,
            catalog,
            button,
            rendered: CartOverlay::empty(),
            open: false,
        }
    }

    /// Rebuild the overlay from the cart and fresh product data.
    pub async fn render(&mut self) -> &CartOverlay {
        let lines = self.cart.read();
        if lines.is_empty() {
            self.button.sync(true);
            self.rendered = CartOverlay::empty();
            return &self.rendered;
        }

        // Stock is validated by the service at checkout, not here.
        self.button.sync(false);

        let hydrated = hydrate(lines, &self.catalog).await;
        let total: Price = hydrated.iter().map(HydratedLine::line_total).sum();

        self.rendered = CartOverlay {
            body: CartBody::Lines(hydrated.iter().map(CartLineView::from).collect()),
            total: total.to_string(),
            checkout_enabled: self.button.is_enabled(),
        };
        &self.rendered
    }

    /// Apply a line command, then re-render everything.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written. The overlay is still
    /// re-rendered from whatever the cart holds.
    pub async fn dispatch(&mut self, command: &CartCommand) -> Result<&CartOverlay, StorageError> {
        let applied = match command {
            CartCommand::Remove { id, size } => self.cart.remove(id, size),
            CartCommand::Increment { id, size } => self.cart.increment_quantity(id, size),
        };
        let overlay = self.render().await;
        applied.map(|()| overlay)
    }

    /// The last rendered overlay.
    pub const fn overlay(&self) -> &CartOverlay {
        &self.rendered
    }

    /// Whether the overlay is showing.
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Render and show the overlay.
    pub async fn open(&mut self) -> &CartOverlay {
        self.render().await;
        self.open = true;
        &self.rendered
    }

    /// Hide the overlay.
    pub const fn close(&mut self) {
        self.open = false;
    }

    /// Close when open, otherwise render and open.
    pub async fn toggle(&mut self) {
        if self.open {
            self.close();
        } else {
            self.open().await;
        }
    }

    /// Keyboard handling: Escape closes an open overlay.
    pub fn handle_key(&mut self, key: &str) {
        if key == "Escape" && self.open {
            self.close();
        }
    }
}
