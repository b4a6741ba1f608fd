//! Category route handlers.

use axum::{Json, extract::State, http::StatusCode};

use super::extract::ApiJson;
use crate::error::Result;
use crate::models::{Category, NewCategoryInput};
use crate::services::CatalogService;
use crate::state::AppState;

/// List all categories.
///
/// GET /categories
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    let categories = CatalogService::new(state.store()).list_categories().await?;
    Ok(Json(categories))
}

/// Create a category. Names are unique ignoring case.
///
/// POST /categories
pub async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewCategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = CatalogService::new(state.store())
        .create_category(input)
        .await?;
    Ok((StatusCode::CREATED, Json(category)))
}
