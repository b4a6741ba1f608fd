//! Cart and cart item models.

use bazaar_core::{CartId, CartItemId, ProductId, Quantity, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Product;

/// A user's shopping cart.
///
/// One cart per user is a convention, not a storage constraint: lookups
/// take the oldest cart for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: CartId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

/// A line in a cart.
///
/// `product_id` is not a foreign key: the product may be deleted while the
/// item remains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: CartItemId,
    pub cart_id: CartId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub created_at: DateTime<Utc>,
}

/// A cart item as loaded from the store, with its product joined.
///
/// `product` is `None` for a dangling reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinedCartItem {
    pub item: CartItem,
    pub product: Option<Product>,
}

/// A cart item whose product is known to exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub item: CartItem,
    pub product: Product,
}

/// Response body of `GET /cart`.
///
/// Without a cart this serializes as `{"items": []}`; otherwise the cart's
/// own fields appear next to `items`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartView {
    #[serde(flatten)]
    pub cart: Option<Cart>,
    pub items: Vec<CartLine>,
}

impl CartView {
    /// The view of a user who has no cart yet.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            cart: None,
            items: Vec::new(),
        }
    }
}

/// Raw input of `POST /cart`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCartItemInput {
    pub user_id: Option<String>,
    pub product_id: Option<String>,
    /// Untyped so that fractional and non-numeric quantities get one message.
    pub quantity: Option<serde_json::Value>,
}
