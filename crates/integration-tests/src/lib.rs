//! Integration tests for the Arcane storefront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p arcane-integration-tests
//! ```
//!
//! Tests start an in-process fake of the remote store service on an ephemeral
//! port and drive the real HTTP client and page controller against it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use arcane_storefront::config::ApiConfig;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

#[derive(Default)]
struct ServiceState {
    products: Vec<Value>,
    raw_catalog: Option<String>,
    checkout_override: Option<(StatusCode, String)>,
    lookup_delay: Option<Duration>,
    checkouts: Vec<Value>,
}

type Shared = Arc<Mutex<ServiceState>>;

fn lock(state: &Shared) -> MutexGuard<'_, ServiceState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A product record as the service serves it.
#[must_use]
pub fn product_json(id: &str, name: &str, price: f64, stock: u64) -> Value {
    json!({
        "id": id,
        "name": name,
        "price": price,
        "image": format!("/img/{id}.png"),
        "stock": stock,
        "tags": [],
        "description": format!("The {name}"),
        "fulfillment": "Ships in 2 days",
        "typeLine": "Apparel",
    })
}

/// Fake remote store service bound to 127.0.0.1.
pub struct FakeStoreService {
    base_url: Url,
    state: Shared,
}

impl FakeStoreService {
    /// Start serving `products`.
    ///
    /// # Panics
    ///
    /// Panics if the listener cannot be bound.
    pub async fn spawn(products: Vec<Value>) -> Self {
        let state: Shared = Arc::new(Mutex::new(ServiceState {
            products,
            ..ServiceState::default()
        }));

        let app = Router::new()
            .route("/api/products", get(list_products))
            .route("/api/products/{id}", get(get_product))
            .route("/api/checkout", post(checkout))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake store service");
        let addr = listener.local_addr().expect("Listener has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let base_url = Url::parse(&format!("http://{addr}/")).expect("Invalid service URL");
        Self { base_url, state }
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Client configuration pointing at this service.
    #[must_use]
    pub fn api_config(&self) -> ApiConfig {
        ApiConfig::new(self.base_url.clone())
    }

    /// Serve `body` verbatim from the catalog listing.
    pub fn serve_raw_catalog(&self, body: &str) {
        lock(&self.state).raw_catalog = Some(body.to_owned());
    }

    /// Answer every checkout with `status` and `body`.
    pub fn override_checkout(&self, status: u16, body: &str) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        lock(&self.state).checkout_override = Some((status, body.to_owned()));
    }

    /// Delay every single-product lookup.
    pub fn delay_lookups(&self, delay: Duration) {
        lock(&self.state).lookup_delay = Some(delay);
    }

    /// Checkout bodies received so far.
    #[must_use]
    pub fn checkouts(&self) -> Vec<Value> {
        lock(&self.state).checkouts.clone()
    }

    /// Current stock of a product.
    #[must_use]
    pub fn stock_of(&self, id: &str) -> Option<u64> {
        lock(&self.state)
            .products
            .iter()
            .find(|p| p["id"] == id)
            .and_then(|p| p["stock"].as_u64())
    }
}

async fn list_products(State(state): State<Shared>) -> Response {
    let state = lock(&state);
    match &state.raw_catalog {
        Some(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/json")],
            body.clone(),
        )
            .into_response(),
        None => Json(state.products.clone()).into_response(),
    }
}

async fn get_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    let delay = lock(&state).lookup_delay;
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let state = lock(&state);
    state
        .products
        .iter()
        .find(|p| p["id"] == id.as_str())
        .map_or_else(
            || (StatusCode::NOT_FOUND, Json(json!({"error": "Product not found"}))).into_response(),
            |p| Json(p.clone()).into_response(),
        )
}

async fn checkout(State(state): State<Shared>, Json(body): Json<Value>) -> Response {
    let mut state = lock(&state);
    state.checkouts.push(body.clone());

    if let Some((status, raw)) = &state.checkout_override {
        return (*status, raw.clone()).into_response();
    }

    let items = body["items"].as_array().cloned().unwrap_or_default();
    let mut updated = state.products.clone();
    for item in &items {
        let qty = item["qty"].as_u64().unwrap_or(0);
        let Some(product) = updated.iter_mut().find(|p| p["id"] == item["id"]) else {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": format!("Unknown product {}", item["id"])})),
            )
                .into_response();
        };
        let stock = product["stock"].as_u64().unwrap_or(0);
        if stock < qty {
            return (
                StatusCode::CONFLICT,
                Json(json!({"error": format!("Not enough stock for {}", product["name"].as_str().unwrap_or_default())})),
            )
                .into_response();
        }
        product["stock"] = json!(stock - qty);
    }
    state.products = updated;

    Json(json!({"ok": true, "items": items})).into_response()
}
