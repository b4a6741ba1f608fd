//! Product route handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::MessageResponse;
use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::error::Result;
use crate::models::{
    NewProductInput, Product, ProductQuery, ProductWithCategory, UpdateProductInput,
};
use crate::services::CatalogService;
use crate::state::AppState;

/// List products, newest first.
///
/// GET /products?category=Mobiles&search=iphone
pub async fn index(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ProductQuery>,
) -> Result<Json<Vec<ProductWithCategory>>> {
    let products = CatalogService::new(state.store())
        .list_products(&query)
        .await?;
    Ok(Json(products))
}

/// Show a single product with its category.
///
/// GET /products/{id}
pub async fn show(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<ProductWithCategory>> {
    let product = CatalogService::new(state.store()).get_product(&id).await?;
    Ok(Json(product))
}

/// Create a product in a category given by name.
///
/// POST /products
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = CatalogService::new(state.store())
        .create_product(input)
        .await?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// Partially update a product.
///
/// PUT /products/{id}
pub async fn update(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(input): ApiJson<UpdateProductInput>,
) -> Result<Json<Product>> {
    let product = CatalogService::new(state.store())
        .update_product(&id, input)
        .await?;
    Ok(Json(product))
}

/// Delete a product. Cart items pointing at it are left behind.
///
/// DELETE /products/{id}
pub async fn delete(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> Result<Json<MessageResponse>> {
    CatalogService::new(state.store())
        .delete_product(&id)
        .await?;
    Ok(Json(MessageResponse::new("Product deleted successfully")))
}
