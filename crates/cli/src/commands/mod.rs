//! CLI command implementations.

pub mod migrate;
pub mod pricing;

use secrecy::SecretString;

/// Environment variable holding the storefront database URL.
pub const DATABASE_URL_VAR: &str = "FRESHCART_DATABASE_URL";

/// Read the database URL, falling back to the generic `DATABASE_URL`.
fn database_url() -> Option<SecretString> {
    dotenvy::dotenv().ok();

    std::env::var(DATABASE_URL_VAR)
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
        .filter(|url| !url.is_empty())
        .map(SecretString::from)
}
