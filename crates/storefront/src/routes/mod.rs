//! HTTP route handlers for the storefront API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                              - Liveness
//! GET  /health/ready                        - Database reachability
//!
//! # Pricing (requires auth)
//! GET  /api/pricing/context                 - Caller's pricing context
//!
//! # Products (requires auth)
//! GET  /api/products                        - All products (?page, ?limit, ?search)
//! GET  /api/products/exclusive-offers       - Exclusive offers (?limit)
//! GET  /api/products/best-selling           - Best sellers (?limit)
//! GET  /api/products/new                    - Newest products (?limit)
//! GET  /api/products/buy-again              - Previously ordered (?limit)
//! GET  /api/products/{id}                   - Product detail
//! GET  /api/products/{id}/siblings          - Same catalog group (?limit)
//! GET  /api/products/{id}/similar           - Same subcategory (?limit)
//! GET  /api/subcategories/{id}/products     - Subcategory listing (?page, ?limit)
//! ```
//!
//! Every `/api` route accepts a store selection via `?customerId=` or the
//! `X-Customer-Id` header.

pub mod pricing;
pub mod products;

use axum::{
    Router,
    extract::{FromRequestParts, Path},
    routing::get,
};

use crate::error::AppError;
use crate::state::AppState;

/// Path parameter extractor with JSON rejections.
#[derive(Debug, FromRequestParts)]
#[from_request(via(Path), rejection(AppError))]
pub struct PathId<T>(pub T);

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::all_products))
        .route("/exclusive-offers", get(products::exclusive_offers))
        .route("/best-selling", get(products::best_selling))
        .route("/new", get(products::new_products))
        .route("/buy-again", get(products::buy_again))
        .route("/{id}", get(products::show))
        .route("/{id}/siblings", get(products::siblings))
        .route("/{id}/similar", get(products::similar))
}

/// Create the subcategory routes router.
pub fn subcategory_routes() -> Router<AppState> {
    Router::new().route("/{id}/products", get(products::subcategory_products))
}

/// Create all `/api` routes.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/pricing/context", get(pricing::context))
        .nest("/products", product_routes())
        .nest("/subcategories", subcategory_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/api", api_routes())
}
