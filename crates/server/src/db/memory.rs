//! In-process [`Store`] with the same semantics as the `PostgreSQL` adapter.
//!
//! Collections are plain vectors behind a `tokio` `RwLock`, kept in insertion
//! order. Like the database, nothing ties a cart item to its product: deleting
//! a product leaves dangling items behind.

use async_trait::async_trait;
use bazaar_core::{CartId, CartItemId, ProductId, UserId};
use chrono::Utc;
use tokio::sync::RwLock;

use super::{RepositoryError, Store};
use crate::models::{
    Cart, CartItem, Category, JoinedCartItem, Product, ProductFilter, ProductPatch,
    ProductWithCategory,
};

#[derive(Debug, Default)]
struct Collections {
    categories: Vec<Category>,
    products: Vec<Product>,
    carts: Vec<Cart>,
    cart_items: Vec<CartItem>,
}

impl Collections {
    fn with_category(&self, product: &Product) -> ProductWithCategory {
        ProductWithCategory {
            product: product.clone(),
            category: self
                .categories
                .iter()
                .find(|c| c.id == product.category_id)
                .cloned(),
        }
    }
}

/// [`Store`] holding everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories = self.inner.read().await.categories.clone();
        categories.sort_by_cached_key(|c| (c.name.to_lowercase(), c.created_at));
        Ok(categories)
    }

    async fn find_category_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Category>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .categories
            .iter()
            .find(|c| c.name_matches(name))
            .cloned())
    }

    async fn insert_category(&self, category: &Category) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.categories.iter().any(|c| c.id == category.id) {
            return Err(RepositoryError::Conflict(
                "category already exists".to_owned(),
            ));
        }
        inner.categories.push(category.clone());
        Ok(())
    }

    async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, RepositoryError> {
        let inner = self.inner.read().await;
        // Newest first; insertion order breaks timestamp ties
        Ok(inner
            .products
            .iter()
            .rev()
            .filter(|p| filter.matches(p))
            .map(|p| inner.with_category(p))
            .collect())
    }

    async fn find_product(
        &self,
        id: ProductId,
    ) -> Result<Option<ProductWithCategory>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| inner.with_category(p)))
    }

    async fn insert_product(&self, product: &Product) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.products.iter().any(|p| p.id == product.id) {
            return Err(RepositoryError::Conflict(
                "product already exists".to_owned(),
            ));
        }
        inner.products.push(product.clone());
        Ok(())
    }

    async fn update_product(
        &self,
        id: ProductId,
        patch: &ProductPatch,
    ) -> Result<Product, RepositoryError> {
        let mut inner = self.inner.write().await;
        let product = inner
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RepositoryError::NotFound)?;
        patch.apply(product, Utc::now());
        Ok(product.clone())
    }

    async fn delete_product(&self, id: ProductId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.products.len();
        inner.products.retain(|p| p.id != id);
        Ok(inner.products.len() < before)
    }

    async fn find_cart_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .carts
            .iter()
            .find(|c| &c.user_id == user_id)
            .cloned())
    }

    async fn insert_cart(&self, cart: &Cart) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.carts.iter().any(|c| c.id == cart.id) {
            return Err(RepositoryError::Conflict("cart already exists".to_owned()));
        }
        inner.carts.push(cart.clone());
        Ok(())
    }

    async fn list_cart_items(
        &self,
        cart_id: CartId,
    ) -> Result<Vec<JoinedCartItem>, RepositoryError> {
        let inner = self.inner.read().await;
        Ok(inner
            .cart_items
            .iter()
            .filter(|i| i.cart_id == cart_id)
            .map(|i| JoinedCartItem {
                item: i.clone(),
                product: inner
                    .products
                    .iter()
                    .find(|p| p.id == i.product_id)
                    .cloned(),
            })
            .collect())
    }

    async fn insert_cart_item(&self, item: &CartItem) -> Result<(), RepositoryError> {
        let mut inner = self.inner.write().await;
        if inner.cart_items.iter().any(|i| i.id == item.id) {
            return Err(RepositoryError::Conflict(
                "cart item already exists".to_owned(),
            ));
        }
        inner.cart_items.push(item.clone());
        Ok(())
    }

    async fn find_cart_item(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        Ok(self
            .inner
            .read()
            .await
            .cart_items
            .iter()
            .find(|i| i.id == id)
            .cloned())
    }

    async fn delete_cart_item(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        let mut inner = self.inner.write().await;
        let before = inner.cart_items.len();
        inner.cart_items.retain(|i| i.id != id);
        Ok(inner.cart_items.len() < before)
    }
}
