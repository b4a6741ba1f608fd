//! Cart and cart item repository.

use bazaar_core::{CartId, CartItemId, CategoryId, Price, ProductId, UserId};
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::db::{RepositoryError, map_insert_error};
use crate::models::{Cart, CartItem, JoinedCartItem, Product};

/// Cart item columns followed by the left-joined product, prefixed `product_`.
#[derive(sqlx::FromRow)]
struct CartItemProductRow {
    #[sqlx(flatten)]
    item: CartItem,
    product_ref: Option<ProductId>,
    product_title: Option<String>,
    product_description: Option<String>,
    product_price: Option<Price>,
    product_image_url: Option<String>,
    product_category_id: Option<CategoryId>,
    product_created_at: Option<DateTime<Utc>>,
    product_updated_at: Option<DateTime<Utc>>,
}

impl From<CartItemProductRow> for JoinedCartItem {
    fn from(row: CartItemProductRow) -> Self {
        let product = match (
            row.product_ref,
            row.product_title,
            row.product_description,
            row.product_price,
            row.product_image_url,
            row.product_category_id,
            row.product_created_at,
            row.product_updated_at,
        ) {
            (
                Some(id),
                Some(title),
                Some(description),
                Some(price),
                Some(image_url),
                Some(category_id),
                Some(created_at),
                Some(updated_at),
            ) => Some(Product {
                id,
                title,
                description,
                price,
                image_url,
                category_id,
                created_at,
                updated_at,
            }),
            _ => None,
        };
        Self {
            item: row.item,
            product,
        }
    }
}

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the oldest cart owned by a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_user(&self, user_id: &UserId) -> Result<Option<Cart>, RepositoryError> {
        let cart = sqlx::query_as::<_, Cart>(
            r"
            SELECT id, user_id, created_at
            FROM bazaar.cart
            WHERE user_id = $1
            ORDER BY created_at, id
            LIMIT 1
            ",
        )
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;

        Ok(cart)
    }

    /// Insert a cart.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert(&self, cart: &Cart) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bazaar.cart (id, user_id, created_at)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(cart.id)
        .bind(&cart.user_id)
        .bind(cart.created_at)
        .execute(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "cart"))?;

        Ok(())
    }

    /// List the items of a cart in insertion order, with products joined.
    ///
    /// Items whose product was deleted come back with `product: None`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_items(&self, cart_id: CartId) -> Result<Vec<JoinedCartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemProductRow>(
            r"
            SELECT i.id, i.cart_id, i.product_id, i.quantity, i.created_at,
                   p.id AS product_ref, p.title AS product_title,
                   p.description AS product_description, p.price AS product_price,
                   p.image_url AS product_image_url, p.category_id AS product_category_id,
                   p.created_at AS product_created_at, p.updated_at AS product_updated_at
            FROM bazaar.cart_item i
            LEFT JOIN bazaar.product p ON p.id = i.product_id
            WHERE i.cart_id = $1
            ORDER BY i.created_at, i.id
            ",
        )
        .bind(cart_id)
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(JoinedCartItem::from).collect())
    }

    /// Insert a cart item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the id already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn insert_item(&self, item: &CartItem) -> Result<(), RepositoryError> {
        sqlx::query(
            r"
            INSERT INTO bazaar.cart_item (id, cart_id, product_id, quantity, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(item.id)
        .bind(item.cart_id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.created_at)
        .execute(self.pool)
        .await
        .map_err(|e| map_insert_error(e, "cart item"))?;

        Ok(())
    }

    /// Get a cart item by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_item(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let item = sqlx::query_as::<_, CartItem>(
            r"
            SELECT id, cart_id, product_id, quantity, created_at
            FROM bazaar.cart_item
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(item)
    }

    /// Delete a cart item.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete_item(&self, id: CartItemId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM bazaar.cart_item WHERE id = $1")
            .bind(id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
