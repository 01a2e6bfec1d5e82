//! Catalog service.
//!
//! Resolves the caller's pricing context once, then serves any number of
//! listings under it. Every row passes through [`summarize`], so price
//! suppression and the minimum quantity floor apply uniformly.

mod error;

pub use error::CatalogError;

use sqlx::PgPool;
use tracing::instrument;

use freshcart_core::{
    CustomerId, PricingContext, ProductId, SubcategoryId, UserId, minimum_order_quantity,
    project_product_price, resolve_pricing_context,
};

use crate::db::{CustomerRepository, ProductPage, ProductRepository, ProductRow};
use crate::models::{
    PaginatedProductResponse, ProductDetailResponse, ProductListResponse, ProductSummary,
};

/// Product listings for one caller.
pub struct CatalogService<'a> {
    products: ProductRepository<'a>,
    context: PricingContext,
}

impl<'a> CatalogService<'a> {
    /// Resolve the caller's pricing context and build a service around it.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Pricing` if the customer or price group lookup
    /// fails, or the price group names a malformed column.
    #[instrument(skip(pool, user_id), fields(user_id = %user_id))]
    pub async fn for_caller(
        pool: &'a PgPool,
        user_id: &UserId,
        selected: Option<CustomerId>,
    ) -> Result<Self, CatalogError> {
        let customers = CustomerRepository::new(pool);
        let context = resolve_pricing_context(&customers, user_id, selected).await?;

        Ok(Self::with_context(pool, context))
    }

    /// Build a service for an already resolved context.
    #[must_use]
    pub const fn with_context(pool: &'a PgPool, context: PricingContext) -> Self {
        Self {
            products: ProductRepository::new(pool),
            context,
        }
    }

    /// The pricing context listings are served under.
    #[must_use]
    pub const fn context(&self) -> &PricingContext {
        &self.context
    }

    /// Products flagged as exclusive offers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn exclusive_offers(&self, limit: i64) -> Result<ProductListResponse, CatalogError> {
        let rows = self.products.exclusive_offers(&self.context, limit).await?;
        Ok(self.list(rows))
    }

    /// Best selling products across all customers.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn best_selling(&self, limit: i64) -> Result<ProductListResponse, CatalogError> {
        let rows = self.products.best_selling(&self.context, limit).await?;
        Ok(self.list(rows))
    }

    /// Most recently added products.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn new_products(&self, limit: i64) -> Result<ProductListResponse, CatalogError> {
        let rows = self.products.new_products(&self.context, limit).await?;
        Ok(self.list(rows))
    }

    /// Products the resolved customer ordered before.
    ///
    /// Without a customer there is no history, so nothing is queried.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn buy_again(&self, limit: i64) -> Result<ProductListResponse, CatalogError> {
        let Some(customer_id) = self.context.customer_id() else {
            return Ok(self.list(Vec::new()));
        };

        let rows = self
            .products
            .buy_again(&self.context, customer_id, limit)
            .await?;
        Ok(self.list(rows))
    }

    /// All products, optionally filtered by a search term.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn all_products(
        &self,
        search: Option<&str>,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedProductResponse, CatalogError> {
        let offset = (page - 1).saturating_mul(limit);
        let result = self
            .products
            .all_products(&self.context, search, limit, offset)
            .await?;
        Ok(self.paginate(result, page, limit))
    }

    /// Products in a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Repository` if the query fails.
    pub async fn subcategory_products(
        &self,
        subcategory_id: SubcategoryId,
        page: i64,
        limit: i64,
    ) -> Result<PaginatedProductResponse, CatalogError> {
        let offset = (page - 1).saturating_mul(limit);
        let result = self
            .products
            .subcategory_products(&self.context, subcategory_id, limit, offset)
            .await?;
        Ok(self.paginate(result, page, limit))
    }

    /// Products sharing a catalog group with `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the anchor product does not
    /// exist, and `CatalogError::Repository` if a query fails.
    pub async fn catalog_siblings(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Result<ProductListResponse, CatalogError> {
        self.ensure_exists(product_id).await?;
        let rows = self
            .products
            .catalog_siblings(&self.context, product_id, limit)
            .await?;
        Ok(self.list(rows))
    }

    /// Products in the same subcategory as `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the anchor product does not
    /// exist, and `CatalogError::Repository` if a query fails.
    pub async fn similar_products(
        &self,
        product_id: ProductId,
        limit: i64,
    ) -> Result<ProductListResponse, CatalogError> {
        self.ensure_exists(product_id).await?;
        let rows = self
            .products
            .similar_products(&self.context, product_id, limit)
            .await?;
        Ok(self.list(rows))
    }

    /// A single product.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::ProductNotFound` if the product does not exist,
    /// and `CatalogError::Repository` if the query fails.
    pub async fn product(&self, product_id: ProductId) -> Result<ProductDetailResponse, CatalogError> {
        let row = self
            .products
            .product(&self.context, product_id)
            .await?
            .ok_or(CatalogError::ProductNotFound(product_id))?;

        Ok(ProductDetailResponse {
            product: summarize(row, &self.context),
            pricing: self.context.summary(),
        })
    }

    async fn ensure_exists(&self, product_id: ProductId) -> Result<(), CatalogError> {
        if self.products.product_exists(product_id).await? {
            Ok(())
        } else {
            Err(CatalogError::ProductNotFound(product_id))
        }
    }

    fn list(&self, rows: Vec<ProductRow>) -> ProductListResponse {
        ProductListResponse {
            products: summarize_all(rows, &self.context),
            pricing: self.context.summary(),
        }
    }

    fn paginate(&self, result: ProductPage, page: i64, limit: i64) -> PaginatedProductResponse {
        let offset = (page - 1).saturating_mul(limit);
        let returned = i64::try_from(result.rows.len()).unwrap_or(i64::MAX);

        PaginatedProductResponse {
            products: summarize_all(result.rows, &self.context),
            pricing: self.context.summary(),
            page,
            limit,
            total: result.total,
            has_more: offset.saturating_add(returned) < result.total,
        }
    }
}

/// Present a product row under a pricing context.
#[must_use]
pub fn summarize(row: ProductRow, context: &PricingContext) -> ProductSummary {
    let prices = row.prices(context);

    ProductSummary {
        id: row.id,
        code: row.code,
        name: row.name,
        description: row.description,
        image_url: row.image_url,
        price: project_product_price(&prices, context),
        minimum_qty: minimum_order_quantity(row.minimum_qty),
    }
}

fn summarize_all(rows: Vec<ProductRow>, context: &PricingContext) -> Vec<ProductSummary> {
    rows.into_iter().map(|row| summarize(row, context)).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::{PriceColumn, SubcategoryId};
    use rust_decimal::Decimal;
    use sqlx::postgres::PgPoolOptions;

    use super::*;

    fn priced(column: &str) -> PricingContext {
        PricingContext::Priced {
            customer_id: CustomerId::new(8),
            price_column: PriceColumn::parse(column).unwrap(),
        }
    }

    fn row(price: Option<Decimal>, minimum_qty: Option<i32>) -> ProductRow {
        ProductRow {
            id: ProductId::new(31),
            code: "EGG-12".to_string(),
            name: "Free range eggs x12".to_string(),
            description: Some("Large".to_string()),
            subcategory_id: Some(SubcategoryId::new(2)),
            minimum_qty,
            price,
            image_url: None,
        }
    }

    #[test]
    fn test_summarize_priced_row() {
        let summary = summarize(row(Some(Decimal::new(399, 2)), Some(6)), &priced("TradePrice"));
        assert_eq!(summary.price, Some(Decimal::new(399, 2)));
        assert_eq!(summary.minimum_qty, 6);
        assert_eq!(summary.code, "EGG-12");
    }

    #[test]
    fn test_summarize_null_price_is_zero_when_priced() {
        let summary = summarize(row(None, None), &priced("RetailPrice"));
        assert_eq!(summary.price, Some(Decimal::ZERO));
        assert_eq!(summary.minimum_qty, 1);
    }

    #[test]
    fn test_summarize_catalog_mode_suppresses_price() {
        // Even if a row somehow carried a price, catalog mode hides it
        let summary = summarize(row(Some(Decimal::new(399, 2)), Some(0)), &PricingContext::Catalog);
        assert_eq!(summary.price, None);
        assert_eq!(summary.minimum_qty, 1);
    }

    #[tokio::test]
    async fn test_buy_again_without_customer_skips_query() {
        // Lazy pool never connects; any query would fail
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://nobody@127.0.0.1:1/unused")
            .unwrap();
        let service = CatalogService::with_context(&pool, PricingContext::Catalog);

        let response = service.buy_again(10).await.unwrap();
        assert!(response.products.is_empty());
        assert!(!response.pricing.show_pricing);
        assert!(!response.pricing.customer_present);
    }

    #[test]
    fn test_summarize_negative_minimum_floors_to_one() {
        let summary = summarize(row(None, Some(-3)), &PricingContext::Catalog);
        assert_eq!(summary.minimum_qty, 1);
    }
}
