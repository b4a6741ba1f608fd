//! `PostgreSQL` adapter for the [`Store`] port.
//!
//! Each collection has its own repository borrowing the pool; [`PgStore`]
//! owns the pool and delegates. Queries are checked at runtime, not with the
//! `query!` macros, so the crate builds without a live database.

mod carts;
mod categories;
mod products;

use async_trait::async_trait;
use bazaar_core::{CartId, CartItemId, ProductId, UserId};
use sqlx::PgPool;

use super::{RepositoryError, Store};
use crate::models::{
    Cart, CartItem, Category, JoinedCartItem, Product, ProductFilter, ProductPatch,
    ProductWithCategory,
};

pub use carts::CartRepository;
pub use categories::CategoryRepository;
pub use products::ProductRepository;

/// [`Store`] backed by a `PostgreSQL` pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).list().await
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        CategoryRepository::new(&self.pool).get_by_name(name).await
    }

    async fn insert_category(&self, category: &Category) -> Result<(), RepositoryError> {
        CategoryRepository::new(&self.pool).insert(category).await
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError> {
        ProductRepository::new(&self.pool).list(filter).await
    }

    async fn find_product(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        ProductRepository::new(&self.pool).get_by_id(id).await
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        ProductRepository::new(&self.pool).insert(product).await
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        ProductRepository::new(&self.pool).update(id, patch).await
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        ProductRepository::new(&self.pool).delete(id).await
    }

    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        CartRepository::new(&self.pool).get_by_user(user_id).await
    }

    async fn insert_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool).insert(cart).await
    }

    async fn list_cart_items(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<JoinedCartItem>, RepositoryError> {
        CartRepository::new(&self.pool).list_items(cart_id).await
    }

    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool).insert_item(item).await
    }

    async fn find_cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        CartRepository::new(&self.pool).get_item(id).await
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        CartRepository::new(&self.pool).delete_item(id).await
    }
}
