//! Pricing diagnostics.
//!
//! Resolves a user's pricing context exactly as the storefront does and
//! prints it, for answering "why does this shopper see these prices".
//!
//! # Usage
//!
//! ```bash
//! freshcart-cli pricing --user user-5f2c
//! freshcart-cli pricing --user user-5f2c --customer 42
//! ```

use freshcart_core::{CustomerId, PricingError, PricingSummary, UserId, UserIdError, resolve_pricing_context};
use freshcart_storefront::db::{CustomerRepository, RepositoryError, create_pool};
use thiserror::Error;

use super::{DATABASE_URL_VAR, database_url};

/// Errors that can occur while resolving pricing.
#[derive(Debug, Error)]
pub enum PricingCommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// The user ID argument is invalid.
    #[error("Invalid user id: {0}")]
    InvalidUser(#[from] UserIdError),

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Resolution failed.
    #[error("{0}")]
    Pricing(#[from] PricingError<RepositoryError>),

    /// Output could not be encoded.
    #[error("Encoding error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Resolve the pricing context for a user and return it as pretty JSON.
///
/// # Errors
///
/// Returns `PricingCommandError` if the arguments are invalid, the database
/// is unreachable, or resolution fails.
pub async fn resolve(user: &str, customer: Option<i32>) -> Result<String, PricingCommandError> {
    let user_id = UserId::parse(user)?;
    let database_url =
        database_url().ok_or(PricingCommandError::MissingEnvVar(DATABASE_URL_VAR))?;

    let pool = create_pool(&database_url).await?;
    let customers = CustomerRepository::new(&pool);

    let context =
        resolve_pricing_context(&customers, &user_id, customer.map(CustomerId::new)).await?;
    tracing::info!(
        user_id = %user_id,
        show_pricing = context.show_pricing(),
        "pricing context resolved"
    );

    Ok(serde_json::to_string_pretty(&PricingSummary::from(&context))?)
}
