//! Product response bodies.
//!
//! Every response carries the caller's [`PricingSummary`] flattened beside
//! the products, so the app knows whether to render prices at all.

use freshcart_core::{PricingSummary, ProductId};
use rust_decimal::Decimal;
use serde::Serialize;

/// A product as presented to the app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSummary {
    pub id: ProductId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    /// Price for the caller's price group; `null` in catalog mode.
    #[serde(with = "rust_decimal::serde::float_option")]
    pub price: Option<Decimal>,
    /// Always at least one.
    pub minimum_qty: i32,
}

/// A bounded product listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListResponse {
    pub products: Vec<ProductSummary>,
    #[serde(flatten)]
    pub pricing: PricingSummary,
}

/// One page of a paginated product listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedProductResponse {
    pub products: Vec<ProductSummary>,
    #[serde(flatten)]
    pub pricing: PricingSummary,
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub has_more: bool,
}

/// A single product.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDetailResponse {
    pub product: ProductSummary,
    #[serde(flatten)]
    pub pricing: PricingSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use freshcart_core::{CustomerId, PriceColumn, PricingContext};
    use serde_json::json;

    use super::*;

    fn summary(price: Option<Decimal>) -> ProductSummary {
        ProductSummary {
            id: ProductId::new(5),
            code: "BRD-WHT".to_string(),
            name: "White loaf".to_string(),
            description: None,
            image_url: Some("https://img.example/brd.png".to_string()),
            price,
            minimum_qty: 1,
        }
    }

    #[test]
    fn test_priced_listing_shape() {
        let context = PricingContext::Priced {
            customer_id: CustomerId::new(12),
            price_column: PriceColumn::parse("WholesalePrice").unwrap(),
        };
        let response = ProductListResponse {
            products: vec![summary(Some(Decimal::new(249, 2)))],
            pricing: context.summary(),
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "products": [{
                    "id": 5,
                    "code": "BRD-WHT",
                    "name": "White loaf",
                    "description": null,
                    "imageUrl": "https://img.example/brd.png",
                    "price": 2.49,
                    "minimumQty": 1
                }],
                "customerPresent": true,
                "customerId": 12,
                "priceColumn": "WholesalePrice",
                "showPricing": true
            })
        );
    }

    #[test]
    fn test_catalog_listing_has_null_prices() {
        let response = PaginatedProductResponse {
            products: vec![summary(None)],
            pricing: PricingContext::Catalog.summary(),
            page: 1,
            limit: 20,
            total: 1,
            has_more: false,
        };

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["products"][0]["price"], serde_json::Value::Null);
        assert_eq!(value["showPricing"], false);
        assert_eq!(value["customerPresent"], false);
        assert_eq!(value["customerId"], serde_json::Value::Null);
        assert_eq!(value["priceColumn"], serde_json::Value::Null);
        assert_eq!(value["hasMore"], false);
    }
}
