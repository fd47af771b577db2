//! Command implementations.
//!
//! Each command opens the page it stands for, with that page's anchors, then
//! acts on the initialized controller and prints the resulting view models.

use std::sync::Arc;

use arcane_storefront::api::{ApiError, HttpStoreClient};
use arcane_storefront::config::StorefrontConfig;
use arcane_storefront::controller::{Page, PageAnchors, Storefront};
use arcane_storefront::error::StorefrontError;
use arcane_storefront::storage::FileStore;
use arcane_storefront::views::ChartBackend;
use url::Url;

mod browse;
mod cart;
mod review;

pub use browse::{charts, gallery, product};
pub use cart::{LineCommand, add, cart_command, cart_show, checkout};
pub use review::review;

/// Shared state for one invocation.
pub struct Context {
    store: Arc<FileStore>,
    remote: HttpStoreClient,
    site: Url,
}

impl Context {
    /// Build the file store and HTTP client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, StorefrontError> {
        let remote = HttpStoreClient::new(&config.api)?;
        tracing::debug!(state_file = %config.state_file.display(), "Using file store");
        Ok(Self {
            store: Arc::new(FileStore::new(config.state_file)),
            remote,
            site: config.api.base_url,
        })
    }

    /// A page under the store's site.
    fn page(&self, path: &str, anchors: PageAnchors) -> Result<Page, StorefrontError> {
        let address = self.site.join(path).map_err(ApiError::from)?;
        Ok(Page { address, anchors })
    }

    /// The detail page of one product.
    fn product_page(&self, id: &str) -> Result<Page, StorefrontError> {
        let mut page = self.page("products.html", PageAnchors::PRODUCT)?;
        page.address.query_pairs_mut().append_pair("id", id);
        Ok(page)
    }

    /// A page with only the cart overlay.
    fn cart_page(&self) -> Result<Page, StorefrontError> {
        self.page(
            "cart.html",
            PageAnchors {
                cart_overlay: true,
                ..PageAnchors::default()
            },
        )
    }

    async fn open<B: ChartBackend>(
        &self,
        page: &Page,
        charts: Option<B>,
    ) -> Storefront<FileStore, HttpStoreClient, B> {
        Storefront::init(page, Arc::clone(&self.store), self.remote.clone(), charts).await
    }
}
