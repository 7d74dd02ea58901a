//! Cart flows against a mock backend: stock checks on add, product detail
//! hydration, and the server-cart merge.

use rust_decimal::Decimal;
use serde_json::json;
use velvet_tamarind_integration_tests::{
    API_PREFIX, mock_get, product_page, session, single_product,
};
use velvet_tamarind_storefront::CartError;
use velvet_tamarind_storefront::types::CartItem;
use wiremock::MockServer;

#[tokio::test]
async fn test_add_to_cart_hydrates_product_details() {
    let server = MockServer::start().await;
    mock_get(&server, "product-stock", json!(5)).await;
    mock_get(
        &server,
        "products",
        product_page(
            vec![single_product(1, 11, "jute-rug", "450", 500, 5)],
            1,
            1,
            1,
        ),
    )
    .await;

    let mut shop = session(&server);
    shop.add_to_cart(CartItem::new(1.into(), 11.into(), 2))
        .await
        .expect("stock covers the requested quantity");

    assert_eq!(shop.cart.total_count(), 1);
    assert!(shop.cart.is_loaded());
    assert_eq!(shop.cart.total_price(), Decimal::from(900));

    let details = shop.cart.detailed_items();
    let line = details.first().expect("line resolves against the cache");
    assert_eq!(line.slug, "jute-rug");
    assert_eq!(line.unit_price, Decimal::from(450));
    let expected = format!("{}{API_PREFIX}/products/jute-rug.jpg", server.uri());
    assert_eq!(
        line.image_url.as_deref(),
        Some(expected.as_str()),
        "relative media paths resolve against the media base"
    );
}

#[tokio::test]
async fn test_add_rejects_quantity_over_tracked_stock() {
    let server = MockServer::start().await;
    mock_get(&server, "product-stock", json!(1)).await;

    let mut shop = session(&server);
    let err = shop
        .add_to_cart(CartItem::new(1.into(), 11.into(), 3))
        .await
        .expect_err("only one unit left");

    assert!(matches!(
        err,
        CartError::OutOfStock {
            requested: 3,
            available: 1
        }
    ));
    assert_eq!(shop.cart.total_count(), 0);
}

#[tokio::test]
async fn test_untracked_stock_allows_any_quantity() {
    let server = MockServer::start().await;
    // Zero from the stock endpoint means the variation is not tracked
    mock_get(&server, "product-stock", json!(0)).await;
    mock_get(
        &server,
        "products",
        product_page(
            vec![single_product(1, 11, "jute-rug", "450", 500, 0)],
            1,
            1,
            1,
        ),
    )
    .await;

    let mut shop = session(&server);
    shop.add_to_cart(CartItem::new(1.into(), 11.into(), 99))
        .await
        .expect("untracked stock never rejects");

    let line = shop.cart.items().first().expect("line was added");
    assert_eq!(line.quantity, 99);
}

#[tokio::test]
async fn test_sync_merges_server_cart_into_local() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "cart-items",
        json!([
            {"product_id": 1, "variation_id": 11, "quantity": 3},
            {"product_id": 2, "variation_id": 21, "quantity": 1}
        ]),
    )
    .await;
    mock_get(
        &server,
        "products",
        product_page(
            vec![
                single_product(1, 11, "jute-rug", "450", 500, 10),
                single_product(2, 21, "sylhet-throw", "300", 800, 10),
            ],
            2,
            1,
            1,
        ),
    )
    .await;

    let mut shop = session(&server);
    shop.cart.restore(vec![CartItem::new(1.into(), 11.into(), 2)]);

    let api = shop.api().clone();
    shop.cart.sync(&api).await.expect("server cart fetches");

    assert_eq!(shop.cart.total_count(), 2);
    let first = shop.cart.items().first().expect("merged lines not empty");
    assert_eq!(first.variation_id.as_i64(), 11);
    assert_eq!(first.quantity, 5, "server and local quantities sum");
    let second = shop.cart.items().get(1).expect("server-only line survives");
    assert_eq!(second.variation_id.as_i64(), 21);
    assert_eq!(second.quantity, 1);
}

#[tokio::test]
async fn test_refresh_drops_lines_for_vanished_products() {
    let server = MockServer::start().await;
    mock_get(
        &server,
        "products",
        product_page(
            vec![single_product(1, 11, "jute-rug", "450", 500, 10)],
            1,
            1,
            1,
        ),
    )
    .await;

    let mut shop = session(&server);
    shop.cart.restore(vec![
        CartItem::new(1.into(), 11.into(), 1),
        CartItem::new(9.into(), 91.into(), 2),
    ]);

    let api = shop.api().clone();
    shop.cart.fetch_products(&api).await;

    assert_eq!(shop.cart.total_count(), 1);
    assert!(shop.cart.contains(11.into()));
    assert!(!shop.cart.contains(91.into()));
}
