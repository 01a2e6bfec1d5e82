//! Product listing queries.
//!
//! Every listing projects exactly one price column, chosen by the request's
//! [`PricingContext`]. In catalog mode the price is selected as `NULL`, so a
//! suppressed price never leaves the database.
//!
//! The column name comes from reference data, not from the client, and is
//! spliced in as a quoted identifier after [`PriceColumn`] validation. All
//! other values are bound parameters.

use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, QueryBuilder};

use freshcart_core::{
    CustomerId, PriceColumn, PricingContext, ProductId, ProductPrices, SubcategoryId,
};

use super::RepositoryError;

/// A product row as listed, with the projected price.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub subcategory_id: Option<SubcategoryId>,
    pub minimum_qty: Option<i32>,
    /// Value of the projected price column; always `NULL` in catalog mode.
    pub price: Option<Decimal>,
    /// First product image, if any.
    pub image_url: Option<String>,
}

impl ProductRow {
    /// The price fields this row carries for the given context.
    ///
    /// Only the projected column is ever loaded, and only when it is non-null.
    #[must_use]
    pub fn prices(&self, context: &PricingContext) -> ProductPrices {
        context
            .price_column()
            .map(|column| ProductPrices::single(column.clone(), self.price))
            .unwrap_or_default()
    }
}

/// One page of products plus the total number of matches.
#[derive(Debug, Clone)]
pub struct ProductPage {
    pub rows: Vec<ProductRow>,
    pub total: i64,
}

/// Repository for product listing queries.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Active products flagged as exclusive offers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn exclusive_offers(
        &self,
        context: &PricingContext,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(" WHERE p.is_active AND p.is_exclusive_offer");
        query.push(" ORDER BY p.created_at DESC, p.id LIMIT ");
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// Active products ranked by total quantity ordered.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn best_selling(
        &self,
        context: &PricingContext,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(
            r"
            JOIN (
                SELECT product_id, SUM(quantity) AS sold
                FROM storefront.order_line
                GROUP BY product_id
            ) sales ON sales.product_id = p.id
            WHERE p.is_active
            ORDER BY sales.sold DESC, p.id
            LIMIT ",
        );
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// Most recently added active products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn new_products(
        &self,
        context: &PricingContext,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(" WHERE p.is_active ORDER BY p.created_at DESC, p.id DESC LIMIT ");
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// Active products the customer has ordered before, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn buy_again(
        &self,
        context: &PricingContext,
        customer_id: CustomerId,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(
            r"
            JOIN (
                SELECT ol.product_id, MAX(o.created_at) AS last_ordered
                FROM storefront.order_line ol
                JOIN storefront.customer_order o ON o.id = ol.order_id
                WHERE o.customer_id = ",
        );
        query.push_bind(customer_id);
        query.push(
            r"
                GROUP BY ol.product_id
            ) history ON history.product_id = p.id
            WHERE p.is_active
            ORDER BY history.last_ordered DESC, p.id
            LIMIT ",
        );
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// All active products, optionally filtered by name or code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn all_products(
        &self,
        context: &PricingContext,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<ProductPage, RepositoryError> {
        let pattern = search.map(like_pattern);

        let mut count = QueryBuilder::<Postgres>::new(
            "SELECT COUNT(*) FROM storefront.product p WHERE p.is_active",
        );
        push_search(&mut count, pattern.as_deref());
        let (total,): (i64,) = count.build_query_as().fetch_one(self.pool).await?;

        let mut query = select_listing(context);
        query.push(" WHERE p.is_active");
        push_search(&mut query, pattern.as_deref());
        query.push(" ORDER BY p.name, p.id LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let rows = self.fetch_rows(query).await?;
        Ok(ProductPage { rows, total })
    }

    /// Active products in a subcategory.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if either query fails.
    pub async fn subcategory_products(
        &self,
        context: &PricingContext,
        subcategory_id: SubcategoryId,
        limit: i64,
        offset: i64,
    ) -> Result<ProductPage, RepositoryError> {
        let (total,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM storefront.product p
            WHERE p.is_active AND p.subcategory_id = $1
            ",
        )
        .bind(subcategory_id)
        .fetch_one(self.pool)
        .await?;

        let mut query = select_listing(context);
        query.push(" WHERE p.is_active AND p.subcategory_id = ");
        query.push_bind(subcategory_id);
        query.push(" ORDER BY p.name, p.id LIMIT ");
        query.push_bind(limit);
        query.push(" OFFSET ");
        query.push_bind(offset);

        let rows = self.fetch_rows(query).await?;
        Ok(ProductPage { rows, total })
    }

    /// Other active products in the same catalog group as `product_id`.
    ///
    /// Products without a catalog group have no siblings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn catalog_siblings(
        &self,
        context: &PricingContext,
        product_id: ProductId,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(
            r"
            JOIN storefront.product anchor ON anchor.catalog_group = p.catalog_group
            WHERE anchor.id = ",
        );
        query.push_bind(product_id);
        query.push(" AND p.id <> anchor.id AND p.is_active ORDER BY p.name, p.id LIMIT ");
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// Other active products in the same subcategory as `product_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn similar_products(
        &self,
        context: &PricingContext,
        product_id: ProductId,
        limit: i64,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(
            r"
            JOIN storefront.product anchor ON anchor.subcategory_id = p.subcategory_id
            WHERE anchor.id = ",
        );
        query.push_bind(product_id);
        query.push(" AND p.id <> anchor.id AND p.is_active ORDER BY p.name, p.id LIMIT ");
        query.push_bind(limit);

        self.fetch_rows(query).await
    }

    /// A single active product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product(
        &self,
        context: &PricingContext,
        product_id: ProductId,
    ) -> Result<Option<ProductRow>, RepositoryError> {
        let mut query = select_listing(context);
        query.push(" WHERE p.is_active AND p.id = ");
        query.push_bind(product_id);

        let row = query
            .build_query_as::<ProductRow>()
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Whether an active product exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn product_exists(&self, product_id: ProductId) -> Result<bool, RepositoryError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM storefront.product WHERE id = $1 AND is_active)",
        )
        .bind(product_id)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    async fn fetch_rows(
        &self,
        mut query: QueryBuilder<'_, Postgres>,
    ) -> Result<Vec<ProductRow>, RepositoryError> {
        let rows = query
            .build_query_as::<ProductRow>()
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }
}

/// Start a listing query: the projected columns and `FROM storefront.product p`.
fn select_listing(context: &PricingContext) -> QueryBuilder<'static, Postgres> {
    let mut query = QueryBuilder::new(
        "SELECT p.id, p.code, p.name, p.description, p.subcategory_id, p.minimum_qty, ",
    );
    query.push(price_projection(context.price_column()));
    query.push(
        r",
            (
                SELECT i.url
                FROM storefront.product_image i
                WHERE i.product_id = p.id
                ORDER BY i.position, i.id
                LIMIT 1
            ) AS image_url
        FROM storefront.product p",
    );
    query
}

/// SQL expression for the `price` output column.
fn price_projection(column: Option<&PriceColumn>) -> String {
    column.map_or_else(
        || "NULL::NUMERIC AS price".to_string(),
        |column| format!("p.{}::NUMERIC AS price", column.quoted()),
    )
}

fn push_search(query: &mut QueryBuilder<'_, Postgres>, pattern: Option<&str>) {
    if let Some(pattern) = pattern {
        query.push(" AND (p.name ILIKE ");
        query.push_bind(pattern.to_owned());
        query.push(" OR p.code ILIKE ");
        query.push_bind(pattern.to_owned());
        query.push(")");
    }
}

/// Build a substring `ILIKE` pattern, escaping the wildcard characters.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.trim().chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
