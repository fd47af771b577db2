//! In-crate fake of the remote service for unit tests.

use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use arcane_core::{CartLineItem, Price, Product, ProductId};

use crate::api::{CheckoutError, CheckoutGateway, CheckoutReceipt, ProductCatalog};
use crate::storage::{KeyValueStore, MemoryStore, StorageError};

/// Scripted checkout answer.
#[derive(Debug, Clone)]
pub enum CheckoutScript {
    /// Accept the order and decrement stock.
    Accept,
    /// Refuse with the given status and optional `error` message.
    Reject(u16, Option<String>),
}

#[derive(Debug)]
struct State {
    products: BTreeMap<ProductId, Product>,
    unavailable: HashSet<ProductId>,
    checkout: CheckoutScript,
    submitted: Vec<Vec<CartLineItem>>,
    lookups: usize,
}

/// Fake remote service. Clones share state.
#[derive(Debug, Clone)]
pub struct FakeRemote {
    state: Arc<Mutex<State>>,
    latency: Option<Duration>,
}

pub fn product(id: &str, name: &str, cents: u32, stock: u32) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_owned(),
        price: Price::from_cents(cents),
        image: format!("/img/{id}.png"),
        stock,
        tags: Vec::new(),
        description: String::new(),
        fulfillment: String::new(),
        type_line: String::new(),
    }
}

impl FakeRemote {
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            state: Arc::new(Mutex::new(State {
                products: products.into_iter().map(|p| (p.id.clone(), p)).collect(),
                unavailable: HashSet::new(),
                checkout: CheckoutScript::Accept,
                submitted: Vec::new(),
                lookups: 0,
            })),
            latency: None,
        }
    }

    /// Delay every catalog read by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make lookups of `id` fail.
    pub fn fail_lookups_of(&self, id: &str) {
        self.state().unavailable.insert(ProductId::new(id));
    }

    pub fn script_checkout(&self, script: CheckoutScript) {
        self.state().checkout = script;
    }

    pub fn stock_of(&self, id: &str) -> Option<u32> {
        self.state().products.get(&ProductId::new(id)).map(|p| p.stock)
    }

    pub fn submitted(&self) -> Vec<Vec<CartLineItem>> {
        self.state().submitted.clone()
    }

    pub fn lookups(&self) -> usize {
        self.state().lookups
    }

    async fn wait(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

impl ProductCatalog for FakeRemote {
    async fn list_products(&self) -> Vec<Product> {
        self.wait().await;
        self.state().products.values().cloned().collect()
    }

    async fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.wait().await;
        let mut state = self.state();
        state.lookups += 1;
        if state.unavailable.contains(id) {
            return None;
        }
        state.products.get(id).cloned()
    }
}

impl CheckoutGateway for FakeRemote {
    async fn submit_checkout(
        &self,
        items: &[CartLineItem],
    ) -> Result<CheckoutReceipt, CheckoutError> {
        let mut state = self.state();
        state.submitted.push(items.to_vec());
        match state.checkout.clone() {
            CheckoutScript::Reject(status, message) => Err(CheckoutError::Rejected { status, message }),
            CheckoutScript::Accept => {
                for item in items {
                    if let Some(product) = state.products.get_mut(&item.id) {
                        product.stock = product.stock.saturating_sub(item.qty.get());
                    }
                }
                Ok(CheckoutReceipt(serde_json::json!({"ok": true})))
            }
        }
    }
}

/// In-memory store whose writes to chosen keys fail.
#[derive(Debug, Default)]
pub struct FailingWrites {
    inner: MemoryStore,
    failing: Mutex<HashSet<String>>,
}

impl FailingWrites {
    /// Make every later write to `key` fail.
    pub fn fail_writes_to(&self, key: &str) {
        self.failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned());
    }

    fn check(&self, key: &str) -> Result<(), StorageError> {
        if self
            .failing
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(key)
        {
            return Err(std::io::Error::other(format!("write to {key} refused")).into());
        }
        Ok(())
    }
}

impl KeyValueStore for FailingWrites {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.set(key, value)
    }

    fn clear(&self, key: &str) -> Result<(), StorageError> {
        self.check(key)?;
        self.inner.clear(key)
    }
}
