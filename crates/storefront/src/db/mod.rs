//! Database operations for storefront `PostgreSQL`.
//!
//! # Database: `freshcart`
//!
//! The storefront only reads; reference data and products are provisioned
//! by the back office.
//!
//! ## Tables (schema `storefront`)
//!
//! - `price_group` - Pricing tiers and the product price column each reads
//! - `customer` - Stores/accounts, optionally owned by a user
//! - `subcategory` - Product grouping used by listings
//! - `product` - Catalog rows with one column per price tier
//! - `product_image` - Product images (first by `position` is shown)
//! - `customer_order` / `order_line` - Order history for best-selling and buy-again
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p freshcart-cli -- migrate
//! ```

pub mod customers;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use customers::CustomerRepository;
pub use products::{ProductPage, ProductRepository, ProductRow};

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
