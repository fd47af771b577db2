//! Product detail page.

use arcane_core::{
    CartLineItem, DEFAULT_SIZE, Product, ProductId, SIZE_OPTIONS, TagBadge, TagSurface,
    VariantKey, classify_tags,
};
use thiserror::Error;
use url::Url;

use crate::api::ProductCatalog;
use crate::storage::{KeyValueStore, StorageError};
use crate::stores::CartStore;

/// Replaces the page content when the product cannot be resolved.
pub const PRODUCT_NOT_FOUND_MESSAGE: &str = "Product not found.";

/// The product id carried in a page address (`?id=...`), if non-empty.
#[must_use]
pub fn product_id_from_address(address: &Url) -> Option<ProductId> {
    address
        .query_pairs()
        .find(|(key, _)| key == "id")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
        .map(ProductId::from)
}

/// Rendered product details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDetail {
    pub id: ProductId,
    pub name: String,
    pub image: String,
    pub type_line: String,
    pub price: String,
    pub description: String,
    pub fulfillment: String,
    pub tags: Vec<TagBadge>,
    pub in_stock: bool,
    /// "Add To Cart" or "Out Of Stock".
    pub stock_label: &'static str,
    /// "In Stock: N".
    pub stock_info: String,
}

impl From<&Product> for ProductDetail {
    fn from(product: &Product) -> Self {
        let in_stock = product.in_stock();
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            image: product.image.clone(),
            type_line: product.type_line.clone(),
            price: product.price.to_string(),
            description: product.description.clone(),
            fulfillment: product.fulfillment.clone(),
            tags: classify_tags(&product.tags, TagSurface::Detail),
            in_stock,
            stock_label: if in_stock { "Add To Cart" } else { "Out Of Stock" },
            stock_info: format!("In Stock: {}", product.stock),
        }
    }
}

/// A size outside the fixed option set.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown size: {0}")]
pub struct UnknownSize(pub String);

/// Exclusive choice among the fixed sizes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeSelector {
    selected: Option<VariantKey>,
}

impl SizeSelector {
    /// All selectable sizes.
    #[must_use]
    pub const fn options(&self) -> &'static [&'static str] {
        &SIZE_OPTIONS
    }

    /// Select a size, replacing any previous selection.
    ///
    /// # Errors
    ///
    /// Returns an error if `size` is not one of the options; the selection is
    /// left unchanged.
    pub fn select(&mut self, size: &str) -> Result<(), UnknownSize> {
        if !SIZE_OPTIONS.contains(&size) {
            return Err(UnknownSize(size.to_owned()));
        }
        self.selected = Some(VariantKey::new(size));
        Ok(())
    }

    /// Currently selected size, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<&VariantKey> {
        self.selected.as_ref()
    }

    /// Text of the "selected size" indicator.
    #[must_use]
    pub fn indicator(&self) -> &str {
        self.selected.as_ref().map_or(DEFAULT_SIZE, VariantKey::as_str)
    }

    /// Size to add to the cart: the selection, or the default.
    #[must_use]
    pub fn effective(&self) -> VariantKey {
        self.selected.clone().unwrap_or_default()
    }
}

/// Result of resolving the page's product.
pub enum DetailLoad<V> {
    /// The address carries no product id; the detail feature is skipped.
    NoProductId,
    /// The product could not be resolved.
    NotFound,
    Loaded(V),
}

/// Product detail controller.
pub struct ProductDetailView<S: ?Sized, C> {
    cart: CartStore<S>,
    catalog: C,
    rendered: ProductDetail,
    sizes: SizeSelector,
}

impl<S, C> ProductDetailView<S, C>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog,
{
    /// Resolve the product named by `address` and render it.
    pub async fn load(address: &Url, cart: CartStore<S>, catalog: C) -> DetailLoad<Self> {
        let Some(id) = product_id_from_address(address) else {
            return DetailLoad::NoProductId;
        };

        let Some(product) = catalog.get_product(&id).await else {
            tracing::info!(product_id = %id, "Product not found");
            return DetailLoad::NotFound;
        };

        DetailLoad::Loaded(Self {
            cart,
            catalog,
            rendered: ProductDetail::from(&product),
            sizes: SizeSelector::default(),
        })
    }

    /// The last rendered details.
    pub const fn detail(&self) -> &ProductDetail {
        &self.rendered
    }

    /// Size selection state.
    pub const fn sizes(&self) -> &SizeSelector {
        &self.sizes
    }

    /// Change the selected size.
    ///
    /// # Errors
    ///
    /// Returns an error for a size outside the option set.
    pub fn select_size(&mut self, size: &str) -> Result<(), UnknownSize> {
        self.sizes.select(size)
    }

    /// Add one unit in the selected size. Returns `false` without touching the
    /// cart when the product is out of stock.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub fn add_to_cart(&self) -> Result<bool, StorageError> {
        if !self.rendered.in_stock {
            return Ok(false);
        }
        self.cart.add(CartLineItem::single(
            self.rendered.id.clone(),
            self.sizes.effective(),
        ))?;
        Ok(true)
    }

    /// Re-fetch the product. If it cannot be fetched the previous render stays.
    pub async fn refresh(&mut self) -> &ProductDetail {
        if let Some(product) = self.catalog.get_product(&self.rendered.id).await {
            self.rendered = ProductDetail::from(&product);
        }
        &self.rendered
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::{FakeRemote, product};

    fn address(query: &str) -> Url {
        Url::parse(&format!("http://localhost/products.html{query}")).unwrap()
    }

    async fn load(
        query: &str,
        remote: FakeRemote,
    ) -> (CartStore<MemoryStore>, DetailLoad<ProductDetailView<MemoryStore, FakeRemote>>) {
        let cart = CartStore::new(Arc::new(MemoryStore::new()));
        let loaded = ProductDetailView::load(&address(query), cart.clone(), remote).await;
        (cart, loaded)
    }

    fn loaded<V>(load: DetailLoad<V>) -> V {
        match load {
            DetailLoad::Loaded(view) => view,
            DetailLoad::NoProductId => panic!("expected a product, address had no id"),
            DetailLoad::NotFound => panic!("expected a product, got not found"),
        }
    }

    #[test]
    fn test_product_id_from_address() {
        assert_eq!(
            product_id_from_address(&address("?id=tee%20one&x=1")),
            Some(ProductId::new("tee one"))
        );
        assert_eq!(product_id_from_address(&address("?id=")), None);
        assert_eq!(product_id_from_address(&address("")), None);
    }

    #[tokio::test]
    async fn test_missing_product_is_not_found() {
        let (_, result) = load("?id=ghost", FakeRemote::new([])).await;
        assert!(matches!(result, DetailLoad::NotFound));
    }

    #[tokio::test]
    async fn test_address_without_id_skips_detail() {
        let (_, result) = load("", FakeRemote::new([product("p1", "Tee", 1000, 1)])).await;
        assert!(matches!(result, DetailLoad::NoProductId));
    }

    #[tokio::test]
    async fn test_detail_fields() {
        let mut hoodie = product("p1", "Hoodie", 4500, 3);
        hoodie.tags = vec!["preorder".to_owned()];
        hoodie.type_line = "Hoodie".to_owned();
        let (_, result) = load("?id=p1", FakeRemote::new([hoodie])).await;
        let view = loaded(result);

        let detail = view.detail();
        assert_eq!(detail.price, "$45.00");
        assert_eq!(detail.stock_label, "Add To Cart");
        assert_eq!(detail.stock_info, "In Stock: 3");
        assert_eq!(detail.tags[0].label, "Preorder");
        assert_eq!(detail.tags[0].class, "preorder-tag-style");
    }

    #[tokio::test]
    async fn test_add_uses_selected_size_or_default() {
        let (cart, result) = load("?id=p1", FakeRemote::new([product("p1", "Tee", 1000, 5)])).await;
        let mut view = loaded(result);

        assert_eq!(view.sizes().indicator(), "S");
        assert!(view.add_to_cart().unwrap());

        view.select_size("L").unwrap();
        assert_eq!(view.sizes().indicator(), "L");
        view.select_size("M").unwrap();
        assert_eq!(view.sizes().indicator(), "M");
        assert!(view.add_to_cart().unwrap());

        let sizes: Vec<_> = cart.read().into_iter().map(|l| l.size).collect();
        assert_eq!(sizes, [VariantKey::new("S"), VariantKey::new("M")]);
    }

    #[tokio::test]
    async fn test_unknown_size_keeps_selection() {
        let (_, result) = load("?id=p1", FakeRemote::new([product("p1", "Tee", 1000, 5)])).await;
        let mut view = loaded(result);
        view.select_size("XL").unwrap();

        assert_eq!(view.select_size("XXS"), Err(UnknownSize("XXS".to_string())));
        assert_eq!(view.sizes().indicator(), "XL");
        assert_eq!(view.sizes().selected(), Some(&VariantKey::new("XL")));
    }

    #[test]
    fn test_size_options_start_unselected() {
        let sizes = SizeSelector::default();
        assert_eq!(sizes.options(), ["S", "M", "L", "XL"]);
        assert_eq!(sizes.selected(), None);
        assert_eq!(sizes.indicator(), "S");
    }

    #[tokio::test]
    async fn test_out_of_stock_add_is_noop() {
        let (cart, result) = load("?id=p1", FakeRemote::new([product("p1", "Tee", 1000, 0)])).await;
        let view = loaded(result);

        assert_eq!(view.detail().stock_label, "Out Of Stock");
        assert_eq!(view.detail().stock_info, "In Stock: 0");
        assert!(!view.add_to_cart().unwrap());
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_refresh_keeps_previous_render_when_lookup_fails() {
        let remote = FakeRemote::new([product("p1", "Tee", 1000, 5)]);
        let (_, result) = load("?id=p1", remote.clone()).await;
        let mut view = loaded(result);

        remote.fail_lookups_of("p1");
        let detail = view.refresh().await;
        assert_eq!(detail.stock_info, "In Stock: 5");
    }
}
