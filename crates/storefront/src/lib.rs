//! Freshcart storefront API.
//!
//! Serves product listings to the mobile ordering app. Every listing is
//! scoped to the caller's pricing context: the customer they act for and
//! the price column that customer's group reads.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
