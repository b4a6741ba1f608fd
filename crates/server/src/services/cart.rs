//! Cart service.
//!
//! Cart items reference products by id only. Deleting a product leaves its
//! cart items in place; reads drop them via [`sanitize_items`] without
//! deleting them, so the filtering repeats on every read.

use bazaar_core::{CartId, CartItemId, ProductId, Quantity, UserId};
use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, instrument};

use crate::db::{RepositoryError, Store};
use crate::models::{AddCartItemInput, Cart, CartItem, CartLine, CartView, JoinedCartItem};

/// Errors that can occur during cart operations.
///
/// Display strings are the messages returned to API clients.
#[derive(Debug, Error)]
pub enum CartError {
    /// `userId` missing from a cart lookup.
    #[error("userId is required")]
    UserIdRequired,

    /// A field of an add-item request is missing.
    #[error("userId, productId, and quantity are required")]
    MissingItemFields,

    /// Quantity is not a positive integer.
    #[error("Quantity must be a positive integer")]
    InvalidQuantity,

    /// Product id is not 24 hexadecimal characters.
    #[error("Invalid product ID format (must be 24 hex characters)")]
    InvalidProductId,

    /// Product to add does not exist.
    #[error("Product not found")]
    ProductNotFound,

    /// Cart item id is not 24 hexadecimal characters.
    #[error("Invalid item ID format")]
    InvalidItemId,

    /// No cart item with the given id.
    #[error("Cart item not found")]
    ItemNotFound,

    /// Repository/database error.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// Keep only items whose product still exists.
///
/// Order is preserved. Dangling items are dropped from the result only;
/// nothing is deleted from the store.
#[must_use]
pub fn sanitize_items(items: Vec<JoinedCartItem>) -> Vec<CartLine> {
    items
        .into_iter()
        .filter_map(|joined| {
            joined.product.map(|product| CartLine {
                item: joined.item,
                product,
            })
        })
        .collect()
}

/// Cart service.
///
/// Resolves a user's cart, adds and removes items, and hides items whose
/// product no longer exists.
pub struct CartService<'a> {
    store: &'a dyn Store,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Get a user's cart with dangling items filtered out.
    ///
    /// A user without a cart gets an empty view, not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::UserIdRequired` if `user_id` is missing or blank.
    /// Returns `CartError::Repository` if the store fails.
    #[instrument(name = "cart.get", skip(self))]
    pub async fn get_cart(&self, user_id: Option<&str>) -> Result<CartView, CartError> {
        let user_id = user_id
            .and_then(|id| UserId::parse(id).ok())
            .ok_or(CartError::UserIdRequired)?;

        let Some(cart) = self.store.find_cart_by_user(&user_id).await? else {
            return Ok(CartView::empty());
        };

        let joined = self.store.list_cart_items(cart.id).await?;
        let total = joined.len();
        let items = sanitize_items(joined);
        if items.len() < total {
            debug!(
                cart_id = %cart.id,
                dropped = total - items.len(),
                "Filtered cart items with missing products"
            );
        }

        Ok(CartView {
            cart: Some(cart),
            items,
        })
    }

    /// Add a product to the user's cart, creating the cart if needed.
    ///
    /// Always inserts a new line: adding the same product twice yields two
    /// lines, not one line with a summed quantity.
    ///
    /// # Errors
    ///
    /// Returns `CartError::MissingItemFields` if a field is missing.
    /// Returns `CartError::InvalidQuantity` if quantity is not a positive integer.
    /// Returns `CartError::InvalidProductId` if the product id is malformed.
    /// Returns `CartError::ProductNotFound` if the product does not exist.
    #[instrument(name = "cart.add_item", skip(self, input))]
    pub async fn add_item(&self, input: AddCartItemInput) -> Result<CartItem, CartError> {
        let (Some(user_id), Some(product_id), Some(quantity)) = (
            input.user_id.as_deref().and_then(|id| UserId::parse(id).ok()),
            input.product_id.as_deref().filter(|id| !id.is_empty()),
            input.quantity.as_ref(),
        ) else {
            return Err(CartError::MissingItemFields);
        };

        let quantity = Quantity::from_json(quantity).map_err(|_| CartError::InvalidQuantity)?;
        let product_id = ProductId::parse(product_id).map_err(|_| CartError::InvalidProductId)?;

        if self.store.find_product(product_id).await?.is_none() {
            return Err(CartError::ProductNotFound);
        }

        let cart = self.find_or_create_cart(user_id).await?;

        let item = CartItem {
            id: CartItemId::generate(),
            cart_id: cart.id,
            product_id,
            quantity,
            created_at: Utc::now(),
        };
        self.store.insert_cart_item(&item).await?;

        info!(
            cart_id = %cart.id,
            item_id = %item.id,
            product_id = %product_id,
            quantity = quantity.get(),
            "Cart item added"
        );
        Ok(item)
    }

    /// Remove a cart item by id.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidItemId` if the id is malformed.
    /// Returns `CartError::ItemNotFound` if no such item exists.
    #[instrument(name = "cart.remove_item", skip(self))]
    pub async fn remove_item(&self, item_id: &str) -> Result<(), CartError> {
        let item_id = CartItemId::parse(item_id).map_err(|_| CartError::InvalidItemId)?;

        if self.store.find_cart_item(item_id).await?.is_none() {
            return Err(CartError::ItemNotFound);
        }
        // Removed concurrently after the existence check
        if !self.store.delete_cart_item(item_id).await? {
            return Err(CartError::ItemNotFound);
        }

        info!(item_id = %item_id, "Cart item removed");
        Ok(())
    }

    /// First cart of the user, or a new one.
    ///
    /// Not atomic: two concurrent first adds can each create a cart. Reads
    /// then settle on the oldest.
    async fn find_or_create_cart(&self, user_id: UserId) -> Result<Cart, CartError> {
        if let Some(cart) = self.store.find_cart_by_user(&user_id).await? {
            return Ok(cart);
        }

        let cart = Cart {
            id: CartId::generate(),
            user_id,
            created_at: Utc::now(),
        };
        self.store.insert_cart(&cart).await?;

        debug!(cart_id = %cart.id, user_id = %cart.user_id, "Cart created");
        Ok(cart)
    }
}
