//! Product gallery.

use arcane_core::{CartLineItem, Product, ProductId, TagBadge, TagSurface, VariantKey, classify_tags};

use crate::api::ProductCatalog;
use crate::storage::{KeyValueStore, StorageError};
use crate::stores::CartStore;

/// Shown when the catalog is empty or could not be fetched.
pub const EMPTY_GALLERY_MESSAGE: &str = "No products available.";

/// Link to a product's detail page.
#[must_use]
pub fn detail_href(id: &ProductId) -> String {
    format!("products.html?id={}", urlencoding::encode(id.as_str()))
}

/// One product card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub price: String,
    pub image: String,
    pub tags: Vec<TagBadge>,
    /// The add button is enabled only when the product is in stock.
    pub add_enabled: bool,
    pub add_title: &'static str,
    pub detail_href: String,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        let in_stock = product.in_stock();
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            price: product.price.to_string(),
            image: product.image.clone(),
            tags: classify_tags(&product.tags, TagSurface::Gallery),
            add_enabled: in_stock,
            add_title: if in_stock { "Add to cart" } else { "Out of stock" },
            detail_href: detail_href(&product.id),
        }
    }
}

/// Rendered gallery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gallery {
    Empty { message: &'static str },
    Cards(Vec<ProductCard>),
}

impl Gallery {
    /// Displayed cards, empty for the placeholder.
    #[must_use]
    pub fn cards(&self) -> &[ProductCard] {
        match self {
            Self::Empty { .. } => &[],
            Self::Cards(cards) => cards,
        }
    }
}

/// Where on a card the shopper clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardTarget {
    /// The add-to-cart button.
    AddButton,
    /// Anywhere else on the card.
    Body,
}

/// What a card click did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardActivation {
    /// One unit in the default size was added.
    AddedToCart,
    /// Nothing happened (out of stock or unknown card).
    Ignored,
    /// Go to the product's detail page.
    Navigate(String),
}

/// Gallery controller.
pub struct GalleryView<S: ?Sized, C> {
    cart: CartStore<S>,
    catalog: C,
    rendered: Gallery,
}

impl<S, C> GalleryView<S, C>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog,
{
    /// Create the gallery, not yet rendered.
    pub const fn new(cart: CartStore<S>, catalog: C) -> Self {
        Self {
            cart,
            catalog,
            rendered: Gallery::Empty {
                message: EMPTY_GALLERY_MESSAGE,
            },
        }
    }

    /// Rebuild every card from a fresh catalog listing.
    pub async fn render(&mut self) -> &Gallery {
        let products = self.catalog.list_products().await;
        self.rendered = if products.is_empty() {
            Gallery::Empty {
                message: EMPTY_GALLERY_MESSAGE,
            }
        } else {
            Gallery::Cards(products.iter().map(ProductCard::from).collect())
        };
        &self.rendered
    }

    /// The last rendered gallery.
    pub const fn gallery(&self) -> &Gallery {
        &self.rendered
    }

    /// Handle a click on a rendered card.
    ///
    /// Stock is taken from the render the card came from.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn activate(&self, id: &ProductId, target: CardTarget) -> Result<CardActivation, StorageError> {
        let Some(card) = self.rendered.cards().iter().find(|card| card.id == *id) else {
            return Ok(CardActivation::Ignored);
        };

        match target {
            CardTarget::Body => Ok(CardActivation::Navigate(card.detail_href.clone())),
            CardTarget::AddButton if !card.add_enabled => Ok(CardActivation::Ignored),
            CardTarget::AddButton => {
                self.cart
                    .add(CartLineItem::single(card.id.clone(), VariantKey::default()))?;
                Ok(CardActivation::AddedToCart)
            }
        }
    }
}
