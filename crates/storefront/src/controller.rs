//! Page controller.
//!
//! One controller serves every page. Which features run depends on the anchors
//! the page declares: a feature whose anchors are missing is never created.
//! Views on the same page share one persisted store and one remote client and
//! are kept in step after cart changes and checkouts.

use std::convert::Infallible;
use std::sync::Arc;

use arcane_core::ProductId;
use tracing::{info, instrument, warn};
use url::Url;

use crate::api::{CheckoutGateway, ProductCatalog};
use crate::checkout::{CheckoutButton, CheckoutCoordinator, CheckoutOutcome, RefreshAfterCheckout};
use crate::error::add_breadcrumb;
use crate::storage::{KeyValueStore, StorageError};
use crate::stores::{CartStore, ReviewStore, SalesLedger};
use crate::views::{
    AnalyticsView, CardActivation, CardTarget, CartCommand, CartOverlay, CartView, ChartBackend,
    ChartCanvas, ChartConfig, DetailLoad, GalleryView, PRODUCT_NOT_FOUND_MESSAGE,
    ProductDetailView, ReviewsPanel, UnknownSize, product_id_from_address,
};

/// Feature anchors present on a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct PageAnchors {
    pub cart_overlay: bool,
    pub gallery: bool,
    pub product_detail: bool,
    pub reviews: bool,
    pub charts: bool,
}

impl PageAnchors {
    /// The landing page: gallery and charts.
    pub const INDEX: Self = Self {
        cart_overlay: true,
        gallery: true,
        product_detail: false,
        reviews: false,
        charts: true,
    };

    /// The product page: details and reviews.
    pub const PRODUCT: Self = Self {
        cart_overlay: true,
        gallery: false,
        product_detail: true,
        reviews: true,
        charts: false,
    };
}

/// A page being initialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub address: Url,
    pub anchors: PageAnchors,
}

/// Chart backend for pages without charts.
#[derive(Debug)]
pub enum NoCharts {}

impl ChartBackend for NoCharts {
    type Chart = Infallible;

    fn create(&mut self, _canvas: ChartCanvas, _config: &ChartConfig) -> Infallible {
        match *self {}
    }

    fn destroy(&mut self, chart: Infallible) {
        match chart {}
    }
}

/// The views active on the current page.
pub struct ActiveViews<S: ?Sized, C, B: ChartBackend> {
    pub cart: Option<CartView<S, C>>,
    pub gallery: Option<GalleryView<S, C>>,
    pub detail: Option<ProductDetailView<S, C>>,
    pub reviews: Option<ReviewsPanel<S>>,
    pub analytics: Option<AnalyticsView<S, C, B>>,
}

impl<S, C, B> RefreshAfterCheckout for ActiveViews<S, C, B>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog,
    B: ChartBackend,
{
    async fn refresh_after_checkout(&mut self) {
        if let Some(cart) = &mut self.cart {
            cart.render().await;
        }
        if let Some(detail) = &mut self.detail {
            detail.refresh().await;
        }
        if let Some(gallery) = &mut self.gallery {
            gallery.render().await;
        }
        if let Some(analytics) = &mut self.analytics {
            analytics.render().await;
        }
        if let Some(cart) = &mut self.cart {
            cart.close();
        }
    }
}

/// Storefront page controller.
pub struct Storefront<S: ?Sized, C, B: ChartBackend> {
    cart: CartStore<S>,
    button: Arc<CheckoutButton>,
    coordinator: CheckoutCoordinator<S, C>,
    views: ActiveViews<S, C, B>,
    not_found: bool,
}

impl<S, C, B> Storefront<S, C, B>
where
    S: KeyValueStore + ?Sized,
    C: ProductCatalog + CheckoutGateway + Clone,
    B: ChartBackend,
{
    /// Initialize every feature the page has anchors for.
    ///
    /// Order: cart overlay, gallery, product detail, reviews, charts, then the
    /// initial cart render. If the page's product cannot be resolved the
    /// remaining steps are skipped.
    #[instrument(skip_all, fields(page = %page.address))]
    pub async fn init(page: &Page, store: Arc<S>, remote: C, charts: Option<B>) -> Self {
        let anchors = page.anchors;
        let cart = CartStore::new(Arc::clone(&store));
        let sales = SalesLedger::new(Arc::clone(&store));
        let reviews = ReviewStore::new(Arc::clone(&store));
        let button = Arc::new(CheckoutButton::new(cart.is_empty()));

        let mut storefront = Self {
            coordinator: CheckoutCoordinator::new(
                cart.clone(),
                sales.clone(),
                remote.clone(),
                Arc::clone(&button),
            ),
            views: ActiveViews {
                cart: anchors
                    .cart_overlay
                    .then(|| CartView::new(cart.clone(), remote.clone(), Arc::clone(&button))),
                gallery: None,
                detail: None,
                reviews: None,
                analytics: None,
            },
            cart,
            button,
            not_found: false,
        };

        if anchors.gallery {
            let mut gallery = GalleryView::new(storefront.cart.clone(), remote.clone());
            gallery.render().await;
            storefront.views.gallery = Some(gallery);
        }

        if anchors.product_detail {
            match ProductDetailView::load(&page.address, storefront.cart.clone(), remote.clone())
                .await
            {
                DetailLoad::NoProductId => {}
                DetailLoad::NotFound => {
                    storefront.not_found = true;
                    return storefront;
                }
                DetailLoad::Loaded(detail) => storefront.views.detail = Some(detail),
            }
        }

        if anchors.reviews
            && let Some(id) = product_id_from_address(&page.address)
        {
            storefront.views.reviews = Some(ReviewsPanel::new(id, reviews.clone()));
        }

        if anchors.charts {
            match charts {
                Some(backend) => {
                    let mut analytics = AnalyticsView::new(remote, sales, reviews, backend);
                    analytics.render().await;
                    storefront.views.analytics = Some(analytics);
                }
                None => warn!("No chart backend available, analytics skipped"),
            }
        }

        if let Some(cart_view) = &mut storefront.views.cart {
            cart_view.render().await;
        }

        info!(
            cart = storefront.views.cart.is_some(),
            gallery = storefront.views.gallery.is_some(),
            detail = storefront.views.detail.is_some(),
            reviews = storefront.views.reviews.is_some(),
            analytics = storefront.views.analytics.is_some(),
            "Page initialized"
        );
        storefront
    }

    /// Message replacing the page content, if the page's product was missing.
    pub const fn notice(&self) -> Option<&'static str> {
        if self.not_found {
            Some(PRODUCT_NOT_FOUND_MESSAGE)
        } else {
            None
        }
    }

    pub const fn views(&self) -> &ActiveViews<S, C, B> {
        &self.views
    }

    pub const fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    pub fn button(&self) -> &CheckoutButton {
        &self.button
    }

    /// The reviews panel, for form input.
    pub const fn reviews_mut(&mut self) -> Option<&mut ReviewsPanel<S>> {
        self.views.reviews.as_mut()
    }

    /// Click on a gallery card.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub async fn activate_card(
        &mut self,
        id: &ProductId,
        target: CardTarget,
    ) -> Result<CardActivation, StorageError> {
        let Some(gallery) = &self.views.gallery else {
            return Ok(CardActivation::Ignored);
        };
        let activation = gallery.activate(id, target)?;
        if activation == CardActivation::AddedToCart {
            add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str()), ("size", "S")]));
            self.show_cart().await;
        }
        Ok(activation)
    }

    /// Change the size on the product page.
    ///
    /// # Errors
    ///
    /// Returns an error for a size outside the option set.
    pub fn select_size(&mut self, size: &str) -> Result<(), UnknownSize> {
        self.views
            .detail
            .as_mut()
            .map_or(Ok(()), |detail| detail.select_size(size))
    }

    /// Add the product page's product in the selected size. Returns `false` if
    /// nothing was added.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub async fn add_detail_to_cart(&mut self) -> Result<bool, StorageError> {
        let Some(detail) = &self.views.detail else {
            return Ok(false);
        };
        if !detail.add_to_cart()? {
            return Ok(false);
        }
        let size = detail.sizes().effective();
        add_breadcrumb(
            "cart",
            "Added to cart",
            Some(&[("product_id", detail.detail().id.as_str()), ("size", size.as_str())]),
        );
        self.show_cart().await;
        Ok(true)
    }

    /// Apply a cart line command from the overlay.
    ///
    /// # Errors
    ///
    /// Returns an error if the cart cannot be written.
    pub async fn dispatch_cart(
        &mut self,
        command: &CartCommand,
    ) -> Result<Option<&CartOverlay>, StorageError> {
        let Some(cart_view) = &mut self.views.cart else {
            return Ok(None);
        };
        let (message, id, size) = match command {
            CartCommand::Remove { id, size } => ("Removed from cart", id, size),
            CartCommand::Increment { id, size } => ("Increased quantity", id, size),
        };
        add_breadcrumb("cart", message, Some(&[("product_id", id.as_str()), ("size", size.as_str())]));
        cart_view.dispatch(command).await.map(Some)
    }

    pub async fn toggle_cart(&mut self) {
        if let Some(cart_view) = &mut self.views.cart {
            cart_view.toggle().await;
        }
    }

    pub const fn close_cart(&mut self) {
        if let Some(cart_view) = &mut self.views.cart {
            cart_view.close();
        }
    }

    pub fn handle_key(&mut self, key: &str) {
        if let Some(cart_view) = &mut self.views.cart {
            cart_view.handle_key(key);
        }
    }

    /// Press the checkout button.
    pub async fn checkout(&mut self) -> CheckoutOutcome {
        self.coordinator.checkout(&mut self.views).await
    }

    async fn show_cart(&mut self) {
        match &mut self.views.cart {
            Some(cart_view) => {
                cart_view.open().await;
            }
            None => self.button.sync(self.cart.is_empty()),
        }
    }
}
