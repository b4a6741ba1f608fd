//! Integration tests for Bazaar.
//!
//! These tests talk to a running server over HTTP, so they are `#[ignore]`d
//! by default.
//!
//! # Running Tests
//!
//! ```bash
//! # Apply migrations and start the server
//! cargo run -p bazaar-cli -- migrate
//! cargo run -p bazaar-server
//!
//! # Run integration tests
//! cargo test -p bazaar-integration-tests -- --ignored
//! ```
//!
//! Set `BAZAAR_BASE_URL` to target a server other than `http://localhost:5000`.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL for the API (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BAZAAR_BASE_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// Create an HTTP client.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
#[allow(clippy::expect_used)]
pub fn client() -> Client {
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// A name no other test run will have used, so tests can share a database.
#[must_use]
pub fn unique(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Test helper: create a category and return its JSON.
///
/// # Panics
///
/// Panics if the request fails or the category is not created.
#[allow(clippy::expect_used)]
pub async fn create_category(client: &Client, name: &str) -> Value {
    let resp = client
        .post(format!("{}/categories", base_url()))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("Failed to create category");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse category")
}

/// Test helper: create a product in `category` and return its JSON.
///
/// # Panics
///
/// Panics if the request fails or the product is not created.
#[allow(clippy::expect_used)]
pub async fn create_product(client: &Client, title: &str, category: &str) -> Value {
    let resp = client
        .post(format!("{}/products", base_url()))
        .json(&json!({
            "title": title,
            "description": "Created by integration tests",
            "price": 19.99,
            "imageUrl": "https://images.example.com/test.png",
            "categoryName": category,
        }))
        .send()
        .await
        .expect("Failed to create product");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse product")
}

/// Test helper: delete a product, ignoring the outcome.
pub async fn delete_product(client: &Client, product_id: &str) {
    let _ = client
        .delete(format!("{}/products/{product_id}", base_url()))
        .send()
        .await;
}

/// String field of a JSON object, or an empty string.
#[must_use]
pub fn str_field<'a>(value: &'a Value, field: &str) -> &'a str {
    value[field].as_str().unwrap_or_default()
}
