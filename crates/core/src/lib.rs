//! Bazaar Core - Shared types library.
//!
//! This crate provides common types used across all Bazaar components:
//! - `server` - JSON HTTP API for products, categories and carts
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only value types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Object ids, prices, quantities and user ids, validated on construction

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
