//! Page controller end to end: file-backed store, HTTP client, fake service.

use std::path::PathBuf;
use std::sync::Arc;

use arcane_integration_tests::{FakeStoreService, product_json};
use arcane_storefront::api::HttpStoreClient;
use arcane_storefront::checkout::{CHECKOUT_SUCCESS_MESSAGE, CheckoutOutcome};
use arcane_storefront::controller::{NoCharts, Page, PageAnchors, Storefront};
use arcane_storefront::storage::{CART_KEY, FileStore, KeyValueStore};
use arcane_storefront::stores::SalesLedger;
use arcane_storefront::views::{CardTarget, ChartBackend, ChartCanvas, ChartConfig};

/// Keeps the last config created for each canvas.
#[derive(Default)]
struct LastCharts {
    created: Vec<(ChartCanvas, ChartConfig)>,
}

impl ChartBackend for LastCharts {
    type Chart = ();

    fn create(&mut self, canvas: ChartCanvas, config: &ChartConfig) {
        self.created.push((canvas, config.clone()));
    }

    fn destroy(&mut self, (): ()) {}
}

struct Harness {
    service: FakeStoreService,
    store: Arc<FileStore>,
    client: HttpStoreClient,
}

impl Harness {
    async fn new(name: &str) -> Self {
        let service = FakeStoreService::spawn(vec![
            product_json("p1", "Tee", 10.0, 5),
            product_json("p2", "Cap", 15.0, 2),
        ])
        .await;
        let client = HttpStoreClient::new(&service.api_config()).expect("Failed to build client");
        Self {
            service,
            store: Arc::new(FileStore::new(state_path(name))),
            client,
        }
    }

    fn page(&self, path: &str, anchors: PageAnchors) -> Page {
        Page {
            address: self.service.base_url().join(path).expect("valid page path"),
            anchors,
        }
    }

    async fn index(&self) -> Storefront<FileStore, HttpStoreClient, LastCharts> {
        let page = self.page("index.html", PageAnchors::INDEX);
        Storefront::init(&page, Arc::clone(&self.store), self.client.clone(), Some(LastCharts::default())).await
    }

    async fn product(&self, id: &str) -> Storefront<FileStore, HttpStoreClient, NoCharts> {
        let page = self.page(&format!("products.html?id={id}"), PageAnchors::PRODUCT);
        Storefront::init(&page, Arc::clone(&self.store), self.client.clone(), None).await
    }
}

fn state_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("arcane-it-{}-{name}", std::process::id()));
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("state.json")
}

#[tokio::test]
async fn test_cart_survives_across_pages() {
    let h = Harness::new("across-pages").await;

    let mut detail = h.product("p2").await;
    detail.select_size("L").expect("L is a valid size");
    assert!(detail.add_detail_to_cart().await.expect("cart write"));
    drop(detail);

    let mut index = h.index().await;
    index
        .activate_card(&"p1".into(), CardTarget::AddButton)
        .await
        .expect("cart write");

    let cart = index.views().cart.as_ref().expect("index has a cart overlay");
    let lines: Vec<_> = cart
        .overlay()
        .lines()
        .iter()
        .map(|line| (line.id.as_str().to_owned(), line.size.as_str().to_owned()))
        .collect();
    assert_eq!(
        lines,
        [("p2".to_owned(), "L".to_owned()), ("p1".to_owned(), "S".to_owned())]
    );
    assert_eq!(cart.overlay().total, "$25.00");
}

#[tokio::test]
async fn test_checkout_end_to_end() {
    let h = Harness::new("checkout").await;
    let mut index = h.index().await;
    for _ in 0..3 {
        index
            .activate_card(&"p1".into(), CardTarget::AddButton)
            .await
            .expect("cart write");
    }

    let outcome = index.checkout().await;

    assert!(matches!(outcome, CheckoutOutcome::Completed { .. }));
    assert_eq!(outcome.message(), Some(CHECKOUT_SUCCESS_MESSAGE));
    assert_eq!(h.service.stock_of("p1"), Some(2));
    assert_eq!(h.store.get(CART_KEY).as_deref(), Some("[]"));
    assert_eq!(SalesLedger::new(Arc::clone(&h.store)).units_sold(&"p1".into()), 3);

    let views = index.views();
    let cart = views.cart.as_ref().expect("cart overlay");
    assert!(!cart.is_open());
    assert_eq!(cart.overlay().total, "$0.00");

    let gallery = views.gallery.as_ref().expect("gallery");
    assert!(gallery.gallery().cards()[0].add_enabled);

    let charts = &views.analytics.as_ref().expect("analytics").backend().created;
    assert_eq!(charts.len(), 6);
    let (canvas, sold) = &charts[4];
    assert_eq!(*canvas, ChartCanvas::Sales);
    assert_eq!(sold.data.datasets[0].data, [3.0, 0.0]);
}

#[tokio::test]
async fn test_rejected_checkout_leaves_cart_untouched() {
    let h = Harness::new("rejected").await;
    let mut detail = h.product("p2").await;
    detail.add_detail_to_cart().await.expect("cart write");
    detail.add_detail_to_cart().await.expect("cart write");
    detail.add_detail_to_cart().await.expect("cart write");
    let before = h.store.get(CART_KEY);

    let outcome = detail.checkout().await;

    assert_eq!(outcome.message(), Some("Not enough stock for Cap"));
    assert_eq!(h.store.get(CART_KEY), before);
    assert_eq!(h.service.stock_of("p2"), Some(2));
    assert!(SalesLedger::new(Arc::clone(&h.store)).read().is_empty());
    assert!(detail.button().is_enabled());
}

#[tokio::test]
async fn test_unknown_product_page() {
    let h = Harness::new("unknown").await;
    let page = h.product("ghost").await;

    assert_eq!(page.notice(), Some("Product not found."));
    assert!(page.views().reviews.is_none());
}

#[tokio::test]
async fn test_corrupt_state_file_reads_as_empty() {
    let h = Harness::new("corrupt").await;
    std::fs::create_dir_all(h.store.path().parent().expect("state file has a parent"))
        .expect("create state dir");
    std::fs::write(h.store.path(), "{ definitely not json").expect("write corrupt state");

    let index = h.index().await;

    assert!(index.cart().is_empty());
    assert!(!index.button().is_enabled());
}
