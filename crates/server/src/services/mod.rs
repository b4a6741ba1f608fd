//! Business logic services.
//!
//! # Services
//!
//! - `catalog` - Categories and products, including case-insensitive category resolution
//! - `cart` - Cart lookup, item add/remove, and dangling-reference filtering
//!
//! Services borrow a [`Store`](crate::db::Store) and are cheap to build per request.

pub mod cart;
pub mod catalog;

pub use cart::{CartError, CartService, sanitize_items};
pub use catalog::{CatalogError, CatalogService};
