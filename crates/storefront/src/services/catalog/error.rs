//! Catalog error types.

use thiserror::Error;

use freshcart_core::{PricingError, ProductId};

use crate::db::RepositoryError;

/// Errors that can occur while building a product listing.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The caller's pricing context could not be resolved.
    #[error("pricing resolution failed: {0}")]
    Pricing(#[from] PricingError<RepositoryError>),

    /// The anchor product does not exist or is inactive.
    #[error("product {0} not found")]
    ProductNotFound(ProductId),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}
