//! Data access layer.
//!
//! # Collections
//!
//! - `category` - Product categories (name unique ignoring case, checked by the service)
//! - `product` - Catalog entries, each referencing one category
//! - `cart` - One per user by convention
//! - `cart_item` - Cart lines; `product_id` is NOT a foreign key, so lines
//!   can outlive their product
//!
//! # Adapters
//!
//! - [`PgStore`] - `PostgreSQL` via sqlx (schema `bazaar`)
//! - [`MemoryStore`] - In-process collections with the same semantics
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use bazaar_core::{CartId, CartItemId, ProductId, UserId};
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use crate::models::{
    Cart, CartItem, Category, JoinedCartItem, Product, ProductFilter, ProductPatch,
    ProductWithCategory,
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., duplicate id).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Persistence operations the services need.
///
/// Services compute ids, timestamps and validation; the store persists.
/// Each call is a single query (or a single join); nothing spans calls.
#[async_trait]
pub trait Store: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<(), RepositoryError>;

    /// All categories, ordered by name.
    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError>;
    /// First category whose name equals `name` ignoring case.
    async fn find_category_by_name(&self, name: &str)
    -> Result<Option<Category>, RepositoryError>;
    /// Insert a fully-formed category.
    async fn insert_category(&self, category: &Category) -> Result<(), RepositoryError>;

    /// Products passing `filter`, newest first, with categories joined.
    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError>;
    /// Load a product with its category joined.
    async fn find_product(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError>;
    /// Insert a fully-formed product.
    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError>;
    /// Apply `patch` and return the updated product.
    ///
    /// Returns `RepositoryError::NotFound` if the product does not exist.
    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError>;
    /// Delete by id. Returns true if a product was deleted.
    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError>;

    /// Oldest cart owned by `user_id`.
    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError>;
    /// Insert a fully-formed cart.
    async fn insert_cart(&self, cart: &Cart) -> Result<(), RepositoryError>;
    /// Items of a cart in insertion order, each with its product joined.
    async fn list_cart_items(&self, cart_id: CartId)
    -> Result<Vec<JoinedCartItem>, RepositoryError>;
    /// Insert a fully-formed cart item.
    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError>;
    /// Load a cart item by id.
    async fn find_cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError>;
    /// Delete by id. Returns true if an item was deleted.
    async fn delete_cart_item(&self, id: CartItemId) -> Result<bool, RepositoryError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Map a unique violation to `RepositoryError::Conflict`.
pub(crate) fn map_insert_error(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e
        && db_err.is_unique_violation()
    {
        return RepositoryError::Conflict(format!("{what} already exists"));
    }
    RepositoryError::Database(e)
}
