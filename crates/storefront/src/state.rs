//! Application state shared across handlers.

use std::sync::Arc;

use jsonwebtoken::DecodingKey;
use secrecy::ExposeSecret;
use sqlx::PgPool;

use crate::config::StorefrontConfig;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the database pool and the token verification key.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    jwt_key: DecodingKey,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: &StorefrontConfig, pool: PgPool) -> Self {
        let jwt_key = DecodingKey::from_secret(config.jwt_secret.expose_secret().as_bytes());

        Self {
            inner: Arc::new(AppStateInner {
                pool,
                jwt_key,
            }),
        }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Key used to verify bearer tokens.
    #[must_use]
    pub fn jwt_key(&self) -> &DecodingKey {
        &self.inner.jwt_key
    }
}
