//! Customer-scoped pricing resolution.
//!
//! Every product listing starts by resolving a [`PricingContext`] for the
//! caller. The context decides whether prices are shown at all, which price
//! field applies, and which customer the listing is scoped to.
//!
//! # Resolution order
//!
//! 1. An explicitly selected customer (the store the shopper picked), when it
//!    exists.
//! 2. The customer owned by the requesting user, when one exists.
//! 3. Otherwise catalog browsing: no customer, no prices.
//!
//! A missing customer is never an error. Only store failures propagate.
//!
//! # Projection
//!
//! [`project_product_price`] is the single place a product price is read for
//! presentation. In catalog mode it returns `None` whatever the row holds.

use std::future::Future;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{
    Customer, CustomerId, PriceColumn, PriceColumnError, PriceGroup, PriceGroupId, ProductPrices,
    UserId,
};

/// Read access to the customer and price group reference data.
///
/// Implemented by the database layer; tests use an in-memory map.
pub trait PricingStore {
    /// Error raised when the underlying store cannot be read.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up a customer by its ID.
    fn customer_by_id(
        &self,
        id: CustomerId,
    ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send;

    /// Look up the customer owned by a user.
    fn customer_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<Customer>, Self::Error>> + Send;

    /// Look up a price group by its ID.
    fn price_group_by_id(
        &self,
        id: PriceGroupId,
    ) -> impl Future<Output = Result<Option<PriceGroup>, Self::Error>> + Send;
}

/// Errors that can occur while resolving a pricing context.
#[derive(Debug, thiserror::Error)]
pub enum PricingError<E> {
    /// The customer or price group store could not be read.
    #[error("pricing lookup failed: {0}")]
    Lookup(#[source] E),

    /// A price group names a column that is not a valid identifier.
    #[error("price group {group} has an invalid price column: {source}")]
    InvalidPriceColumn {
        /// The offending price group.
        group: PriceGroupId,
        /// Why the name was rejected.
        source: PriceColumnError,
    },
}

/// Outcome of pricing resolution for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PricingContext {
    /// No customer could be resolved; prices are suppressed.
    Catalog,
    /// A customer was resolved; prices are read from `price_column`.
    Priced {
        /// Customer the listing is scoped to.
        customer_id: CustomerId,
        /// Product price field that applies to this customer.
        price_column: PriceColumn,
    },
}

impl PricingContext {
    /// Whether prices should be shown.
    #[must_use]
    pub const fn show_pricing(&self) -> bool {
        matches!(self, Self::Priced { .. })
    }

    /// Whether a customer record was resolved.
    ///
    /// Always equal to [`Self::show_pricing`].
    #[must_use]
    pub const fn customer_present(&self) -> bool {
        self.show_pricing()
    }

    /// The resolved customer, if any.
    #[must_use]
    pub const fn customer_id(&self) -> Option<CustomerId> {
        match self {
            Self::Catalog => None,
            Self::Priced { customer_id, .. } => Some(*customer_id),
        }
    }

    /// The price column in effect, if any.
    #[must_use]
    pub const fn price_column(&self) -> Option<&PriceColumn> {
        match self {
            Self::Catalog => None,
            Self::Priced { price_column, .. } => Some(price_column),
        }
    }

    /// Wire representation sent alongside listings.
    #[must_use]
    pub fn summary(&self) -> PricingSummary {
        PricingSummary {
            customer_present: self.customer_present(),
            customer_id: self.customer_id(),
            price_column: self.price_column().cloned(),
            show_pricing: self.show_pricing(),
        }
    }
}

/// Serializable view of a [`PricingContext`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingSummary {
    pub customer_present: bool,
    pub customer_id: Option<CustomerId>,
    pub price_column: Option<PriceColumn>,
    pub show_pricing: bool,
}

impl From<&PricingContext> for PricingSummary {
    fn from(context: &PricingContext) -> Self {
        context.summary()
    }
}

/// Resolve the pricing context for a request.
///
/// `explicit_customer_id` is the store the caller selected, if any. An
/// explicit selection that does not exist falls through to the caller's own
/// customer rather than disabling prices.
///
/// # Errors
///
/// Returns `PricingError::Lookup` if the store fails, and
/// `PricingError::InvalidPriceColumn` if the resolved price group names a
/// malformed column.
pub async fn resolve_pricing_context<S>(
    store: &S,
    user_id: &UserId,
    explicit_customer_id: Option<CustomerId>,
) -> Result<PricingContext, PricingError<S::Error>>
where
    S: PricingStore + Sync,
{
    if let Some(requested) = explicit_customer_id {
        match store
            .customer_by_id(requested)
            .await
            .map_err(PricingError::Lookup)?
        {
            Some(customer) => {
                let price_column = resolve_price_column(store, &customer).await?;
                tracing::debug!(
                    customer_id = %requested,
                    price_column = %price_column,
                    "pricing resolved from selected store"
                );
                return Ok(PricingContext::Priced {
                    customer_id: requested,
                    price_column,
                });
            }
            None => {
                tracing::debug!(
                    customer_id = %requested,
                    user_id = %user_id,
                    "selected store not found, trying user's own customer"
                );
            }
        }
    }

    let Some(customer) = store
        .customer_by_user(user_id)
        .await
        .map_err(PricingError::Lookup)?
    else {
        tracing::debug!(user_id = %user_id, "no customer for user, catalog mode");
        return Ok(PricingContext::Catalog);
    };

    let price_column = resolve_price_column(store, &customer).await?;
    tracing::debug!(
        user_id = %user_id,
        customer_id = %customer.id,
        price_column = %price_column,
        "pricing resolved from user's customer"
    );

    Ok(PricingContext::Priced {
        customer_id: customer.id,
        price_column,
    })
}

/// Resolve the price column for a customer's price group.
///
/// Missing group and missing column both fall back to
/// [`PriceColumn::DEFAULT`].
async fn resolve_price_column<S>(
    store: &S,
    customer: &Customer,
) -> Result<PriceColumn, PricingError<S::Error>>
where
    S: PricingStore + Sync,
{
    let group_id = customer.effective_price_group();
    let group = store
        .price_group_by_id(group_id)
        .await
        .map_err(PricingError::Lookup)?;

    match group.and_then(|g| g.price_column) {
        Some(name) => PriceColumn::parse(&name).map_err(|source| {
            PricingError::InvalidPriceColumn {
                group: group_id,
                source,
            }
        }),
        None => {
            tracing::debug!(
                price_group_id = %group_id,
                "price group has no column, using default"
            );
            Ok(PriceColumn::default())
        }
    }
}

/// A product row exposing price fields by column name.
pub trait PriceFields {
    /// Value of the named price field, or `None` if the row does not carry it.
    fn price_field(&self, column: &PriceColumn) -> Option<Decimal>;
}

impl PriceFields for ProductPrices {
    fn price_field(&self, column: &PriceColumn) -> Option<Decimal> {
        self.get(column)
    }
}

/// Project the price to present for a product row.
///
/// Returns `None` in catalog mode regardless of the row. In priced mode
/// returns the field named by the context's column, or zero if the row
/// lacks that field.
#[must_use]
pub fn project_product_price<R>(row: &R, context: &PricingContext) -> Option<Decimal>
where
    R: PriceFields + ?Sized,
{
    match context {
        PricingContext::Catalog => None,
        PricingContext::Priced { price_column, .. } => {
            Some(row.price_field(price_column).unwrap_or(Decimal::ZERO))
        }
    }
}

/// Minimum order quantity to present for a product.
///
/// Absent, zero and negative values all mean one unit.
#[must_use]
pub fn minimum_order_quantity(raw: Option<i32>) -> i32 {
    match raw {
        Some(qty) if qty > 0 => qty,
        _ => 1,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("store offline")]
    struct StoreOffline;

    /// In-memory store keyed the same way as the database tables.
    #[derive(Default)]
    struct MemoryStore {
        customers: Vec<Customer>,
        groups: HashMap<PriceGroupId, PriceGroup>,
        offline: bool,
        lookups: AtomicUsize,
    }

    impl MemoryStore {
        fn with_customer(
            mut self,
            id: i32,
            user: Option<&str>,
            group: Option<i32>,
        ) -> Self {
            self.customers.push(Customer {
                id: CustomerId::new(id),
                user_id: user.map(|u| UserId::parse(u).unwrap()),
                price_group_id: group.map(PriceGroupId::new),
            });
            self
        }

        fn with_group(mut self, id: i32, column: Option<&str>) -> Self {
            self.groups.insert(
                PriceGroupId::new(id),
                PriceGroup {
                    id: PriceGroupId::new(id),
                    name: None,
                    price_column: column.map(str::to_owned),
                },
            );
            self
        }

        fn check(&self) -> Result<(), StoreOffline> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            if self.offline { Err(StoreOffline) } else { Ok(()) }
        }
    }

    impl PricingStore for MemoryStore {
        type Error = StoreOffline;

        async fn customer_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreOffline> {
            self.check()?;
            Ok(self.customers.iter().find(|c| c.id == id).cloned())
        }

        async fn customer_by_user(
            &self,
            user_id: &UserId,
        ) -> Result<Option<Customer>, StoreOffline> {
            self.check()?;
            Ok(self
                .customers
                .iter()
                .find(|c| c.user_id.as_ref() == Some(user_id))
                .cloned())
        }

        async fn price_group_by_id(
            &self,
            id: PriceGroupId,
        ) -> Result<Option<PriceGroup>, StoreOffline> {
            self.check()?;
            Ok(self.groups.get(&id).cloned())
        }
    }

    fn user(id: &str) -> UserId {
        UserId::parse(id).unwrap()
    }

    fn column(name: &str) -> PriceColumn {
        PriceColumn::parse(name).unwrap()
    }

    fn row(fields: &[(&str, Decimal)]) -> ProductPrices {
        fields
            .iter()
            .map(|(name, value)| (column(name), *value))
            .collect()
    }

    #[tokio::test]
    async fn test_no_customer_is_catalog_mode() {
        let store = MemoryStore::default().with_group(1, Some("RetailPrice"));

        let context = resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap();

        assert_eq!(context, PricingContext::Catalog);
        assert_eq!(
            context.summary(),
            PricingSummary {
                customer_present: false,
                customer_id: None,
                price_column: None,
                show_pricing: false,
            }
        );
    }

    #[tokio::test]
    async fn test_explicit_customer_uses_its_price_group() {
        let store = MemoryStore::default()
            .with_group(1, Some("RetailPrice"))
            .with_group(3, Some("WholesalePrice"))
            .with_customer(42, None, Some(3));

        let context = resolve_pricing_context(&store, &user("U1"), Some(CustomerId::new(42)))
            .await
            .unwrap();

        assert_eq!(
            context,
            PricingContext::Priced {
                customer_id: CustomerId::new(42),
                price_column: column("WholesalePrice"),
            }
        );

        let product = row(&[
            ("RetailPrice", Decimal::new(990, 1)),
            ("WholesalePrice", Decimal::new(875, 1)),
        ]);
        assert_eq!(
            project_product_price(&product, &context),
            Some(Decimal::new(875, 1))
        );
    }

    #[tokio::test]
    async fn test_explicit_customer_wins_over_users_own() {
        let store = MemoryStore::default()
            .with_group(1, Some("RetailPrice"))
            .with_group(2, Some("TradePrice"))
            .with_customer(7, Some("U1"), None)
            .with_customer(8, None, Some(2));

        let context = resolve_pricing_context(&store, &user("U1"), Some(CustomerId::new(8)))
            .await
            .unwrap();

        assert_eq!(context.customer_id(), Some(CustomerId::new(8)));
        assert_eq!(context.price_column(), Some(&column("TradePrice")));
    }

    #[tokio::test]
    async fn test_unknown_explicit_customer_falls_back_to_user() {
        let store = MemoryStore::default()
            .with_group(1, Some("RetailPrice"))
            .with_customer(7, Some("U1"), None);

        let context = resolve_pricing_context(&store, &user("U1"), Some(CustomerId::new(999)))
            .await
            .unwrap();

        assert!(context.show_pricing());
        assert_eq!(context.customer_id(), Some(CustomerId::new(7)));
        assert_eq!(context.price_column(), Some(&column("RetailPrice")));
    }

    #[tokio::test]
    async fn test_unknown_explicit_customer_without_user_customer_is_catalog() {
        let store = MemoryStore::default().with_group(1, Some("RetailPrice"));

        let context = resolve_pricing_context(&store, &user("U1"), Some(CustomerId::new(999)))
            .await
            .unwrap();

        assert_eq!(context, PricingContext::Catalog);
    }

    #[tokio::test]
    async fn test_missing_price_group_uses_default_column() {
        let store = MemoryStore::default().with_customer(7, Some("U1"), Some(5));

        let context = resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap();

        assert_eq!(context.price_column(), Some(&column(PriceColumn::DEFAULT)));
    }

    #[tokio::test]
    async fn test_baseline_group_missing_uses_default_column() {
        let store = MemoryStore::default().with_customer(7, Some("U1"), None);

        let context = resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap();

        assert_eq!(
            context,
            PricingContext::Priced {
                customer_id: CustomerId::new(7),
                price_column: PriceColumn::default(),
            }
        );
    }

    #[tokio::test]
    async fn test_group_without_column_uses_default_column() {
        let store = MemoryStore::default()
            .with_group(4, None)
            .with_customer(7, Some("U1"), Some(4));

        let context = resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap();

        assert_eq!(context.price_column(), Some(&PriceColumn::default()));
    }

    #[tokio::test]
    async fn test_malformed_column_is_an_error() {
        let store = MemoryStore::default()
            .with_group(1, Some("Retail Price"))
            .with_customer(7, Some("U1"), None);

        let err = resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PricingError::InvalidPriceColumn { group, .. } if group == PriceGroupId::BASELINE
        ));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let store = MemoryStore {
            offline: true,
            ..MemoryStore::default()
        };

        let err = resolve_pricing_context(&store, &user("U1"), Some(CustomerId::new(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, PricingError::Lookup(StoreOffline)));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_catalog_mode_skips_price_group_lookup() {
        let store = MemoryStore::default();

        resolve_pricing_context(&store, &user("U1"), None)
            .await
            .unwrap();

        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_catalog_mode_suppresses_every_price() {
        let rows = [
            row(&[]),
            row(&[("RetailPrice", Decimal::new(1250, 2))]),
            row(&[
                ("RetailPrice", Decimal::ZERO),
                ("WholesalePrice", Decimal::new(1, 0)),
            ]),
        ];

        for product in &rows {
            assert_eq!(project_product_price(product, &PricingContext::Catalog), None);
        }
    }

    #[test]
    fn test_priced_mode_reads_exact_field() {
        let context = PricingContext::Priced {
            customer_id: CustomerId::new(1),
            price_column: column("RetailPrice"),
        };

        for cents in [0_i64, 1, 99, 12_345, 9_999_999] {
            let value = Decimal::new(cents, 2);
            let product = row(&[("RetailPrice", value), ("WholesalePrice", Decimal::ONE)]);
            assert_eq!(project_product_price(&product, &context), Some(value));
        }
    }

    #[test]
    fn test_priced_mode_missing_field_is_zero() {
        let context = PricingContext::Priced {
            customer_id: CustomerId::new(1),
            price_column: column("TradePrice"),
        };
        let product = row(&[("RetailPrice", Decimal::new(5, 0))]);

        assert_eq!(project_product_price(&product, &context), Some(Decimal::ZERO));
    }

    #[test]
    fn test_minimum_order_quantity() {
        assert_eq!(minimum_order_quantity(None), 1);
        assert_eq!(minimum_order_quantity(Some(0)), 1);
        assert_eq!(minimum_order_quantity(Some(-3)), 1);
        assert_eq!(minimum_order_quantity(Some(1)), 1);
        assert_eq!(minimum_order_quantity(Some(12)), 12);
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let context = PricingContext::Priced {
            customer_id: CustomerId::new(42),
            price_column: column("WholesalePrice"),
        };

        let json = serde_json::to_value(context.summary()).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "customerPresent": true,
                "customerId": 42,
                "priceColumn": "WholesalePrice",
                "showPricing": true,
            })
        );
    }
}
