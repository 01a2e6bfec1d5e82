//! Integration tests for product listings under each pricing mode.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (freshcart-cli migrate)
//! - The storefront running against it (cargo run -p freshcart-storefront)
//! - `FRESHCART_JWT_SECRET` matching the server's
//!
//! Run with: cargo test -p freshcart-integration-tests -- --ignored

use freshcart_integration_tests::{Fixture, TestContext};
use reqwest::StatusCode;
use serde_json::Value;

async fn get_json(ctx: &TestContext, user: &str, path: &str) -> Value {
    let resp = ctx.get_as(user, path).await;
    assert_eq!(resp.status(), StatusCode::OK, "GET {path}");
    resp.json().await.expect("Failed to parse JSON")
}

/// Find a product in a listing by ID.
fn product(listing: &Value, id: i32) -> &Value {
    listing["products"]
        .as_array()
        .expect("products array")
        .iter()
        .find(|p| p["id"] == id)
        .unwrap_or_else(|| panic!("product {id} missing from listing"))
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_search_listing_projects_wholesale_prices() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let listing = get_json(
        &ctx,
        &fx.priced_user,
        &format!("/api/products?search={}", fx.search_term()),
    )
    .await;

    assert_eq!(listing["showPricing"], true);
    assert_eq!(listing["priceColumn"], "WholesalePrice");
    assert_eq!(listing["total"], 2);

    let first = product(&listing, fx.first_product);
    assert_eq!(first["price"], 1.2);
    assert_eq!(first["minimumQty"], 1);

    // NULL in the applicable column reads as zero
    let second = product(&listing, fx.second_product);
    assert_eq!(second["price"], 0.0);
    assert_eq!(second["minimumQty"], 6);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_catalog_mode_suppresses_every_price() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let listing = get_json(
        &ctx,
        &fx.anonymous_user,
        &format!("/api/products?search={}", fx.search_term()),
    )
    .await;

    assert_eq!(listing["showPricing"], false);
    assert_eq!(listing["customerPresent"], false);
    for p in listing["products"].as_array().expect("products array") {
        assert!(p["price"].is_null(), "price leaked in catalog mode: {p}");
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_selected_store_changes_listing_prices() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let listing = get_json(
        &ctx,
        &fx.priced_user,
        &format!(
            "/api/products?search={}&customerId={}",
            fx.search_term(),
            fx.trade_customer
        ),
    )
    .await;

    assert_eq!(listing["priceColumn"], "TradePrice");
    assert_eq!(product(&listing, fx.first_product)["price"], 1.0);
    assert_eq!(product(&listing, fx.second_product)["price"], 2.0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_buy_again() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let listing = get_json(&ctx, &fx.priced_user, "/api/products/buy-again?limit=100").await;
    let ids: Vec<i64> = listing["products"]
        .as_array()
        .expect("products array")
        .iter()
        .filter_map(|p| p["id"].as_i64())
        .collect();
    assert_eq!(ids, vec![i64::from(fx.second_product)]);

    let listing = get_json(&ctx, &fx.anonymous_user, "/api/products/buy-again").await;
    assert_eq!(listing["products"], Value::Array(Vec::new()));
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_siblings_and_similar() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let siblings = get_json(
        &ctx,
        &fx.default_user,
        &format!("/api/products/{}/siblings", fx.first_product),
    )
    .await;
    let sibling = product(&siblings, fx.second_product);
    assert_eq!(sibling["price"], 3.0);
    assert_eq!(siblings["products"].as_array().expect("array").len(), 1);

    let similar = get_json(
        &ctx,
        &fx.default_user,
        &format!("/api/products/{}/similar", fx.second_product),
    )
    .await;
    assert_eq!(product(&similar, fx.first_product)["price"], 1.5);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_product_detail_and_not_found() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let detail = get_json(
        &ctx,
        &fx.priced_user,
        &format!("/api/products/{}", fx.first_product),
    )
    .await;
    assert_eq!(detail["product"]["id"], fx.first_product);
    assert_eq!(detail["product"]["price"], 1.2);

    let resp = ctx
        .get_as(&fx.priced_user, "/api/products/2147483647/siblings")
        .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx.get_as(&fx.priced_user, "/api/products/apples").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_subcategory_pagination() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let path = format!("/api/subcategories/{}/products?limit=1", fx.subcategory);
    let first_page = get_json(&ctx, &fx.priced_user, &path).await;
    assert_eq!(first_page["total"], 2);
    assert_eq!(first_page["page"], 1);
    assert_eq!(first_page["hasMore"], true);

    let second_page = get_json(&ctx, &fx.priced_user, &format!("{path}&page=2")).await;
    assert_eq!(second_page["hasMore"], false);
    assert_eq!(second_page["products"].as_array().expect("array").len(), 1);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn test_exclusive_offers_include_flagged_product() {
    let ctx = TestContext::new().await;
    let fx = Fixture::seed(&ctx.pool).await;

    let listing = get_json(&ctx, &fx.priced_user, "/api/products/exclusive-offers?limit=100").await;
    assert!(
        listing["products"]
            .as_array()
            .expect("array")
            .iter()
            .any(|p| p["id"] == fx.first_product)
    );
}
