//! Customer and price group lookups.
//!
//! Backs [`PricingStore`] with unique-key reads against `storefront.customer`
//! and `storefront.price_group`.

use sqlx::PgPool;

use freshcart_core::{Customer, CustomerId, PriceGroup, PriceGroupId, PricingStore, UserId};

use super::RepositoryError;

/// Customer row as stored.
#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    user_id: Option<String>,
    price_group_id: Option<PriceGroupId>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = RepositoryError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let user_id = row
            .user_id
            .as_deref()
            .map(UserId::parse)
            .transpose()
            .map_err(|e| {
                RepositoryError::DataCorruption(format!(
                    "invalid user id on customer {}: {e}",
                    row.id
                ))
            })?;

        Ok(Self {
            id: row.id,
            user_id,
            price_group_id: row.price_group_id,
        })
    }
}

/// Price group row as stored.
#[derive(Debug, sqlx::FromRow)]
struct PriceGroupRow {
    id: PriceGroupId,
    name: Option<String>,
    price_column: Option<String>,
}

impl From<PriceGroupRow> for PriceGroup {
    fn from(row: PriceGroupRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price_column: row.price_column,
        }
    }
}

/// Repository for customer and price group reads.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a customer by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user id is invalid.
    pub async fn get_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_id, price_group_id
            FROM storefront.customer
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Get the customer owned by a user.
    ///
    /// A user is expected to own at most one customer; if several match, the
    /// lowest ID wins.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored user id is invalid.
    pub async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Customer>, RepositoryError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r"
            SELECT id, user_id, price_group_id
            FROM storefront.customer
            WHERE user_id = $1
            ORDER BY id
            LIMIT 1
            ",
        )
        .bind(user_id.as_str())
        .fetch_optional(self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Get a price group by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_price_group(
        &self,
        id: PriceGroupId,
    ) -> Result<Option<PriceGroup>, RepositoryError> {
        let row = sqlx::query_as::<_, PriceGroupRow>(
            r"
            SELECT id, name, price_column
            FROM storefront.price_group
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(PriceGroup::from))
    }
}

impl PricingStore for CustomerRepository<'_> {
    type Error = RepositoryError;

    async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, RepositoryError> {
        self.get_by_id(id).await
    }

    async fn customer_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Customer>, RepositoryError> {
        self.get_by_user(user_id).await
    }

    async fn price_group_by_id(
        &self,
        id: PriceGroupId,
    ) -> Result<Option<PriceGroup>, RepositoryError> {
        self.get_price_group(id).await
    }
}
