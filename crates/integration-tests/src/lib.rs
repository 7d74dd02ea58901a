//! Shared fixtures for the end-to-end storefront tests.
//!
//! Tests drive a [`Storefront`] session against a `wiremock` server standing
//! in for the commerce backend. The JSON builders here produce the backend's
//! wire shapes; keep them in sync with the DTOs in
//! `velvet-tamarind-storefront`.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p velvet-tamarind-integration-tests
//!
//! # With request logging
//! RUST_LOG=velvet_tamarind_storefront=debug cargo test -p velvet-tamarind-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Once;

use serde_json::{Value, json};
use url::Url;
use velvet_tamarind_storefront::{Storefront, StorefrontConfig};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path prefix the mock backend serves under, matching a typical deployment.
pub const API_PREFIX: &str = "/api/v1";

static TRACING: Once = Once::new();

/// Initialize test logging once per process. `RUST_LOG` controls the filter.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// A storefront session pointed at the mock backend.
///
/// # Panics
///
/// Panics if the session cannot be constructed.
#[must_use]
pub fn session(server: &MockServer) -> Storefront {
    init_tracing();
    let base = Url::parse(&format!("{}{API_PREFIX}/", server.uri()))
        .expect("mock server URI must parse");
    Storefront::new(StorefrontConfig::new(base)).expect("session must construct")
}

/// Mount a `GET` endpoint returning `body` as JSON.
pub async fn mock_get(server: &MockServer, endpoint: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("{API_PREFIX}/{endpoint}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

// =============================================================================
// Fixture Builders
// =============================================================================

/// A single-variation product in the backend's wire shape.
#[must_use]
pub fn single_product(
    id: i64,
    variation_id: i64,
    slug: &str,
    price: &str,
    weight: i64,
    stock: i64,
) -> Value {
    json!({
        "id": id,
        "name": display_name(slug),
        "slug": slug,
        "type": "single",
        "variation_name": null,
        "price": price,
        "sale_price": null,
        "media": [{"id": null, "url": format!("products/{slug}.jpg"), "alt_text": null}],
        "variations": [{
            "variation_id": variation_id,
            "name": display_name(slug),
            "price": price,
            "sale_price": null,
            "qty_available": stock,
            "weight": weight,
            "sku": null
        }],
        "attributes": [],
        "brand_id": null,
        "description": null
    })
}

/// A variable product with an option template and one entry per variation:
/// `(variation_id, "L|Red", price, stock)`.
#[must_use]
pub fn variable_product(
    id: i64,
    slug: &str,
    template: &str,
    variations: &[(i64, &str, &str, i64)],
) -> Value {
    let first_price = variations.first().map_or("0", |(_, _, price, _)| price);
    let wire_variations: Vec<Value> = variations
        .iter()
        .map(|(variation_id, name, price, stock)| {
            json!({
                "variation_id": variation_id,
                "name": name,
                "price": price,
                "sale_price": null,
                "qty_available": stock,
                "weight": 500,
                "sku": null
            })
        })
        .collect();

    json!({
        "id": id,
        "name": display_name(slug),
        "slug": slug,
        "type": "variable",
        "variation_name": template,
        "price": first_price,
        "sale_price": null,
        "media": [{"id": null, "url": format!("products/{slug}.jpg"), "alt_text": null}],
        "variations": wire_variations,
        "attributes": [],
        "brand_id": null,
        "description": null
    })
}

/// One page of a product listing.
#[must_use]
pub fn product_page(products: Vec<Value>, total: u64, last_page: u32, current_page: u32) -> Value {
    json!({
        "data": products,
        "total": total,
        "last_page": last_page,
        "current_page": current_page
    })
}

/// Store settings with the charges the checkout tests compute against:
/// inside city 60 + 20/kg, outside city 120 + 30/kg, rewards 100..=2000
/// points at 0.5 per point.
#[must_use]
pub fn store_settings() -> Value {
    json!({
        "inside_city_charge": "60",
        "outside_city_charge": "120",
        "inside_city_charge_per_kg": "20",
        "outside_city_charge_per_kg": "30",
        "minimum_order_total": null,
        "cart_hold_minutes": null,
        "advance_payment": false,
        "advance_amount": "0",
        "allow_overselling": false,
        "reward_point": {
            "min_redeem_point": 100,
            "max_redeem_point": 2000,
            "amount_for_unit_rp": "0.5"
        }
    })
}

/// A three-level category tree (women > bags > totes, plus men).
#[must_use]
pub fn category_tree() -> Value {
    json!([
        {
            "id": 1,
            "name": "Women",
            "slug": "women",
            "image_url": "categories/women.jpg",
            "children": [
                {
                    "id": 2,
                    "name": "Bags",
                    "slug": "bags",
                    "image_url": null,
                    "children": [
                        {"id": 3, "name": "Totes", "slug": "totes", "image_url": null, "children": []}
                    ]
                }
            ]
        },
        {"id": 4, "name": "Men", "slug": "men", "image_url": null, "children": []}
    ])
}

/// Home page content referencing the [`category_tree`] slugs.
#[must_use]
pub fn home_content() -> Value {
    json!({
        "featured_categories": ["women", "women/bags/totes"],
        "sections": [
            {"name": "Eid Collection", "slug": "eid-collection"},
            {"name": "New Arrivals", "slug": "new-arrivals"}
        ],
        "sliders": [
            {"image_url": "sliders/eid.jpg", "link": "/offers/eid-sale", "title": "Eid Sale"}
        ]
    })
}

/// A signed-in customer profile with a reward-point balance.
#[must_use]
pub fn customer_profile(reward_points: i64) -> Value {
    json!({
        "id": 9,
        "name": "Ayesha Rahman",
        "email": "ayesha@example.com",
        "total_rp": reward_points,
        "addresses": [
            {"id": 4, "name": "Home", "phone": "01700000000", "address": "12 Lake Road, Sylhet", "is_default": true}
        ],
        "created_at": null
    })
}

fn display_name(slug: &str) -> String {
    slug.replace('-', " ")
}
