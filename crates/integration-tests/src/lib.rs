//! Integration test support for Freshcart.
//!
//! # Running Tests
//!
//! ```bash
//! # Migrate and start the storefront
//! cargo run -p freshcart-cli -- migrate
//! cargo run -p freshcart-storefront
//!
//! # Run integration tests against it
//! cargo test -p freshcart-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `FRESHCART_BASE_URL` - Storefront URL (default: `http://localhost:3000`)
//! - `FRESHCART_DATABASE_URL` - Same database the server uses (falls back to `DATABASE_URL`)
//! - `FRESHCART_JWT_SECRET` - Same secret the server verifies tokens with
//!
//! Every fixture is keyed by a random suffix, so runs never collide and
//! leftover rows from earlier runs are harmless.

#![allow(clippy::missing_panics_doc)]

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// Base URL for the storefront API.
#[must_use]
pub fn base_url() -> String {
    std::env::var("FRESHCART_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

#[derive(Serialize)]
struct Claims<'a> {
    sub: &'a str,
    exp: usize,
}

/// Shared handles for one test.
pub struct TestContext {
    pub client: Client,
    pub base_url: String,
    pub pool: PgPool,
    jwt_secret: SecretString,
}

impl TestContext {
    /// Connect to the database and build an HTTP client.
    pub async fn new() -> Self {
        let database_url = std::env::var("FRESHCART_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .expect("FRESHCART_DATABASE_URL or DATABASE_URL must be set");
        let jwt_secret = std::env::var("FRESHCART_JWT_SECRET")
            .map(SecretString::from)
            .expect("FRESHCART_JWT_SECRET must be set");

        let pool = PgPool::connect(&database_url)
            .await
            .expect("Failed to connect to database");

        Self {
            client: Client::new(),
            base_url: base_url(),
            pool,
            jwt_secret,
        }
    }

    /// Mint a bearer token for a user, valid for ten minutes.
    #[must_use]
    pub fn token_for(&self, user_id: &str) -> String {
        let exp = chrono::Utc::now().timestamp() + 600;
        let claims = Claims {
            sub: user_id,
            exp: usize::try_from(exp).expect("timestamp fits in usize"),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.expose_secret().as_bytes()),
        )
        .expect("Failed to sign token")
    }

    /// GET a path as a user.
    pub async fn get_as(&self, user_id: &str, path: &str) -> Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .bearer_auth(self.token_for(user_id))
            .send()
            .await
            .expect("Request failed")
    }
}

/// Rows seeded for one test run.
///
/// - `priced_user` owns `wholesale_customer` (group 2, `WholesalePrice`)
/// - `default_user` owns `default_customer` (no group, so `RetailPrice`)
/// - `trade_customer` (group 3, `TradePrice`) has no owner
/// - `anonymous_user` owns nothing
/// - `first_product` and `second_product` share a subcategory and a catalog
///   group; `second_product` has no wholesale price and a minimum of 6
/// - `wholesale_customer` has ordered `second_product`
pub struct Fixture {
    pub suffix: String,
    pub priced_user: String,
    pub default_user: String,
    pub anonymous_user: String,
    pub wholesale_customer: i32,
    pub default_customer: i32,
    pub trade_customer: i32,
    pub subcategory: i32,
    pub first_product: i32,
    pub second_product: i32,
}

impl Fixture {
    /// Seed a fresh fixture.
    pub async fn seed(pool: &PgPool) -> Self {
        let suffix: String = Uuid::new_v4().simple().to_string().chars().take(10).collect();
        let priced_user = format!("it-priced-{suffix}");
        let default_user = format!("it-default-{suffix}");
        let anonymous_user = format!("it-anon-{suffix}");

        let wholesale_customer = insert_customer(pool, Some(&priced_user), Some(2)).await;
        let default_customer = insert_customer(pool, Some(&default_user), None).await;
        let trade_customer = insert_customer(pool, None, Some(3)).await;

        let (subcategory,): (i32,) = sqlx::query_as(
            "INSERT INTO storefront.subcategory (name) VALUES ($1) RETURNING id",
        )
        .bind(format!("it-{suffix}"))
        .fetch_one(pool)
        .await
        .expect("Failed to insert subcategory");

        let group = format!("it-group-{suffix}");
        let (first_product,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO storefront.product
                (code, name, subcategory_id, catalog_group, minimum_qty,
                 "RetailPrice", "WholesalePrice", "TradePrice", is_exclusive_offer)
            VALUES ($1, $2, $3, $4, NULL, 1.50, 1.20, 1.00, TRUE)
            RETURNING id
            "#,
        )
        .bind(format!("IT{suffix}-1"))
        .bind(format!("Test apples {suffix}"))
        .bind(subcategory)
        .bind(&group)
        .fetch_one(pool)
        .await
        .expect("Failed to insert product");

        let (second_product,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO storefront.product
                (code, name, subcategory_id, catalog_group, minimum_qty,
                 "RetailPrice", "WholesalePrice", "TradePrice")
            VALUES ($1, $2, $3, $4, 6, 3.00, NULL, 2.00)
            RETURNING id
            "#,
        )
        .bind(format!("IT{suffix}-2"))
        .bind(format!("Test bananas {suffix}"))
        .bind(subcategory)
        .bind(&group)
        .fetch_one(pool)
        .await
        .expect("Failed to insert product");

        let (order,): (i32,) = sqlx::query_as(
            "INSERT INTO storefront.customer_order (customer_id) VALUES ($1) RETURNING id",
        )
        .bind(wholesale_customer)
        .fetch_one(pool)
        .await
        .expect("Failed to insert order");

        sqlx::query(
            "INSERT INTO storefront.order_line (order_id, product_id, quantity) VALUES ($1, $2, 12)",
        )
        .bind(order)
        .bind(second_product)
        .execute(pool)
        .await
        .expect("Failed to insert order line");

        Self {
            suffix,
            priced_user,
            default_user,
            anonymous_user,
            wholesale_customer,
            default_customer,
            trade_customer,
            subcategory,
            first_product,
            second_product,
        }
    }

    /// Search term matching exactly this fixture's products.
    #[must_use]
    pub fn search_term(&self) -> String {
        format!("IT{}-", self.suffix)
    }
}

async fn insert_customer(pool: &PgPool, user_id: Option<&str>, price_group: Option<i32>) -> i32 {
    let (id,): (i32,) = sqlx::query_as(
        "INSERT INTO storefront.customer (user_id, price_group_id) VALUES ($1, $2) RETURNING id",
    )
    .bind(user_id)
    .bind(price_group)
    .fetch_one(pool)
    .await
    .expect("Failed to insert customer");
    id
}
