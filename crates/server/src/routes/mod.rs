//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health               - Liveness check
//! GET    /health/ready         - Readiness check (pings the store)
//!
//! # Products
//! GET    /products             - Product listing (?category=&search=)
//! GET    /products/{id}        - Product detail
//! POST   /products             - Create product
//! PUT    /products/{id}        - Partial update
//! DELETE /products/{id}        - Delete product
//!
//! # Categories
//! GET    /categories           - Category listing
//! POST   /categories           - Create category
//!
//! # Cart
//! GET    /cart?userId=         - Cart with live items
//! POST   /cart                 - Add item
//! DELETE /cart/{item_id}       - Remove item
//! ```

pub mod cart;
pub mod categories;
pub mod extract;
pub mod health;
pub mod products;

use axum::{
    Router,
    extract::Request,
    http::{Method, Uri},
    middleware,
    routing::{delete, get},
};
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// Body of successful deletions.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route(
            "/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
}

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new().route("/", get(categories::index).post(categories::create))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).post(cart::add))
        .route("/{item_id}", delete(cart::remove))
}

/// Create all API routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/products", product_routes())
        .nest("/categories", category_routes())
        .nest("/cart", cart_routes())
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
}

/// Build the full application: routes, state, request ids and tracing.
///
/// Sentry layers are added by the binary, since they need an initialized client.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
}

/// Request span with a `request_id` slot filled in by the request ID middleware.
fn request_span(request: &Request) -> Span {
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = tracing::field::Empty,
    )
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    AppError::MethodNotAllowed(format!("{method} not allowed on {}", uri.path()))
}
