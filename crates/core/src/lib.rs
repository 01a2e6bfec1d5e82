//! Freshcart Core - Shared types and pricing resolution.
//!
//! This crate provides the domain types used across Freshcart components:
//! - `storefront` - JSON API consumed by the mobile ordering app
//! - `cli` - Command-line tools for migrations and diagnostics
//!
//! # Architecture
//!
//! The core crate contains only types, traits and pure logic - no database
//! access, no HTTP. Reference data is reached through the [`PricingStore`]
//! trait, which the storefront implements over `PostgreSQL`.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, user ids, price columns and customers
//! - [`pricing`] - Pricing context resolution and price projection

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod pricing;
pub mod types;

pub use pricing::{
    PriceFields, PricingContext, PricingError, PricingStore, PricingSummary,
    minimum_order_quantity, project_product_price, resolve_pricing_context,
};
pub use types::*;
