//! Core types for Freshcart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod customer;
pub mod id;
pub mod price;
pub mod user;

pub use customer::{Customer, PriceGroup};
pub use id::*;
pub use price::{PriceColumn, PriceColumnError, ProductPrices};
pub use user::{UserId, UserIdError};
