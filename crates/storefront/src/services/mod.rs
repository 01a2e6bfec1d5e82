//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `catalog` - Product listings scoped to the caller's pricing context

pub mod catalog;

pub use catalog::{CatalogError, CatalogService};
