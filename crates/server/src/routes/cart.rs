//! Cart route handlers.
//!
//! Carts are keyed by a caller-supplied `userId`; there is no session or
//! authentication in front of them.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use super::MessageResponse;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::Result;
use crate::models::{AddCartItemInput, CartItem, CartView};
use crate::services::CartService;
use crate::state::AppState;

/// Query string of `GET /cart`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartQuery {
    pub user_id: Option<String>,
}

/// Show the user's cart, hiding items whose product was deleted.
///
/// GET /cart?userId=...
pub async fn show(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<CartQuery>,
) -> Result<Json<CartView>> {
    let cart = CartService::new(state.store())
        .get_cart(query.user_id.as_deref())
        .await?;
    Ok(Json(cart))
}

/// Add an item to the user's cart.
///
/// POST /cart
pub async fn add(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<AddCartItemInput>,
) -> Result<(StatusCode, Json<CartItem>)> {
    let item = CartService::new(state.store()).add_item(input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Remove an item from its cart.
///
/// DELETE /cart/{item_id}
pub async fn remove(
    State(state): State<AppState>,
    ApiPath(item_id): ApiPath<String>,
) -> Result<Json<MessageResponse>> {
    CartService::new(state.store())
        .remove_item(&item_id)
        .await?;
    Ok(Json(MessageResponse::new("Item removed from cart")))
}
