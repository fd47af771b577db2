//! HTTP client for the remote inventory service.
//!
//! Uses `reqwest` with JSON bodies. Nothing is cached: products are always
//! fetched fresh so stock reflects the latest checkout.

use std::sync::Arc;

use arcane_core::{CartLineItem, Product, ProductId};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{
    ApiError, CheckoutError, CheckoutGateway, CheckoutReceipt, CheckoutRequest, ProductCatalog,
};
use crate::config::ApiConfig;

/// Client for the remote catalog and checkout endpoints.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct HttpStoreClient {
    inner: Arc<HttpStoreClientInner>,
}

struct HttpStoreClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl HttpStoreClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            inner: Arc::new(HttpStoreClientInner {
                client: builder.build()?,
                base_url: config.base_url.clone(),
            }),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.inner.base_url.join(path)?)
    }

    /// GET a JSON document, treating any non-success status as an error.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let url = self.endpoint(path)?;
        let response = self.inner.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

impl ProductCatalog for HttpStoreClient {
    #[instrument(skip(self))]
    async fn list_products(&self) -> Vec<Product> {
        match self.get_json::<Vec<Product>>("api/products").await {
            Ok(products) => {
                debug!(count = products.len(), "Fetched catalog");
                products
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch catalog, showing no products");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self), fields(product_id = %id))]
    async fn get_product(&self, id: &ProductId) -> Option<Product> {
        let path = format!("api/products/{}", urlencoding::encode(id.as_str()));
        match self.get_json::<Product>(&path).await {
            Ok(product) => Some(product),
            Err(ApiError::Status { status: 404 }) => {
                debug!("Product not found");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch product");
                None
            }
        }
    }
}

impl CheckoutGateway for HttpStoreClient {
    #[instrument(skip(self, items), fields(lines = items.len()))]
    async fn submit_checkout(
        &self,
        items: &[CartLineItem],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let url = self.endpoint("api/checkout").map_err(CheckoutError::from)?;
        let response = self
            .inner
            .client
            .post(url)
            .json(&CheckoutRequest { items })
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;
        // A body that is not JSON reads as an empty payload.
        let payload: serde_json::Value = serde_json::from_str(&body).unwrap_or_default();

        if !status.is_success() {
            let message = payload
                .get("error")
                .and_then(serde_json::Value::as_str)
                .map(str::to_owned);
            tracing::error!(status = %status, ?payload, "Checkout failed");
            return Err(CheckoutError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        debug!("Checkout accepted");
        Ok(CheckoutReceipt(payload))
    }
}
