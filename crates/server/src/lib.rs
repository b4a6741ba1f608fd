//! Bazaar server library.
//!
//! JSON API over a product catalog and per-user shopping carts. Exposed as a
//! library so the router can be driven in tests and the CLI can reuse the
//! catalog service for seeding.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
