//! `HttpStoreClient` against the fake store service.

use std::num::NonZeroU32;
use std::time::Duration;

use arcane_core::{CartLineItem, ProductId};
use arcane_integration_tests::{FakeStoreService, product_json};
use arcane_storefront::api::{
    CHECKOUT_FALLBACK_MESSAGE, CheckoutError, CheckoutGateway, HttpStoreClient, ProductCatalog,
};
use arcane_storefront::config::ApiConfig;

async fn service() -> FakeStoreService {
    FakeStoreService::spawn(vec![
        product_json("p1", "Tee", 10.0, 5),
        product_json("p 2", "Cap", 15.5, 1),
    ])
    .await
}

fn client(service: &FakeStoreService) -> HttpStoreClient {
    HttpStoreClient::new(&service.api_config()).expect("Failed to build client")
}

#[tokio::test]
async fn test_list_products() {
    let service = service().await;
    let products = client(&service).list_products().await;

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Tee");
    assert_eq!(products[1].price.to_string(), "$15.50");
    assert_eq!(products[0].type_line, "Apparel");
}

#[tokio::test]
async fn test_get_product_encodes_id() {
    let service = service().await;
    let product = client(&service)
        .get_product(&ProductId::new("p 2"))
        .await
        .expect("Product should resolve");

    assert_eq!(product.name, "Cap");
    assert_eq!(product.stock, 1);
}

#[tokio::test]
async fn test_missing_product_is_absent() {
    let service = service().await;
    assert!(client(&service).get_product(&ProductId::new("ghost")).await.is_none());
}

#[tokio::test]
async fn test_malformed_catalog_degrades_to_empty() {
    let service = service().await;
    service.serve_raw_catalog(r#"{"not": "a list"#);

    assert!(client(&service).list_products().await.is_empty());
}

#[tokio::test]
async fn test_unreachable_service_degrades_to_empty() {
    let config = ApiConfig::new("http://127.0.0.1:9/".parse().expect("valid url"));
    let client = HttpStoreClient::new(&config).expect("Failed to build client");

    assert!(client.list_products().await.is_empty());
    assert!(client.get_product(&ProductId::new("p1")).await.is_none());
}

#[tokio::test]
async fn test_request_timeout_degrades_like_a_failure() {
    let service = service().await;
    service.delay_lookups(Duration::from_secs(5));
    let mut config = service.api_config();
    config.request_timeout = Some(Duration::from_millis(100));
    let client = HttpStoreClient::new(&config).expect("Failed to build client");

    assert!(client.get_product(&ProductId::new("p1")).await.is_none());
}

#[tokio::test]
async fn test_checkout_sends_items_and_decrements_stock() {
    let service = service().await;
    let items = [CartLineItem::new("p1", "M", NonZeroU32::new(3).expect("non-zero"))];

    let receipt = client(&service)
        .submit_checkout(&items)
        .await
        .expect("Checkout should succeed");

    assert_eq!(receipt.0["ok"], true);
    assert_eq!(
        service.checkouts(),
        [serde_json::json!({"items": [{"id": "p1", "size": "M", "qty": 3}]})]
    );
    assert_eq!(service.stock_of("p1"), Some(2));
}

#[tokio::test]
async fn test_rejected_checkout_carries_server_message() {
    let service = service().await;
    let items = [CartLineItem::new("p1", "S", NonZeroU32::new(9).expect("non-zero"))];

    let err = client(&service)
        .submit_checkout(&items)
        .await
        .expect_err("Checkout should be rejected");

    assert!(matches!(err, CheckoutError::Rejected { status: 409, .. }));
    assert_eq!(err.user_message(), "Not enough stock for Tee");
    assert_eq!(service.stock_of("p1"), Some(5));
}

#[tokio::test]
async fn test_rejection_without_json_uses_fallback_message() {
    let service = service().await;
    service.override_checkout(500, "<html>oops</html>");
    let items = [CartLineItem::single("p1", "S")];

    let err = client(&service)
        .submit_checkout(&items)
        .await
        .expect_err("Checkout should fail");

    assert_eq!(err.user_message(), CHECKOUT_FALLBACK_MESSAGE);
}
