//! Request and response models for the storefront API.

pub mod product;
pub mod query;

pub use product::{
    PaginatedProductResponse, ProductDetailResponse, ProductListResponse, ProductSummary,
};
pub use query::{ListQuery, PageQuery};
