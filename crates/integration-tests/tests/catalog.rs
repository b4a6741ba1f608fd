//! Integration tests for categories and products.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations applied
//! - The server running (cargo run -p bazaar-server)

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bazaar_integration_tests::{
    base_url, client, create_category, create_product, delete_product, str_field, unique,
};
use reqwest::StatusCode;
use serde_json::{Value, json};

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_health_and_readiness() {
    let client = client();

    let resp = client
        .get(format!("{}/health", base_url()))
        .send()
        .await
        .expect("Failed to call /health");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    let resp = client
        .get(format!("{}/health/ready", base_url()))
        .send()
        .await
        .expect("Failed to call /health/ready");
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// Categories
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_category_conflicts_ignoring_case() {
    let client = client();
    let name = unique("Shoes");
    create_category(&client, &name).await;

    let resp = client
        .post(format!("{}/categories", base_url()))
        .json(&json!({ "name": name.to_uppercase() }))
        .send()
        .await
        .expect("Failed to post category");
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "Category already exists");
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_categories_listed() {
    let client = client();
    let name = unique("Garden");
    let created = create_category(&client, &name).await;

    let resp = client
        .get(format!("{}/categories", base_url()))
        .send()
        .await
        .expect("Failed to list categories");
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Vec<Value> = resp.json().await.unwrap();
    assert!(body.iter().any(|c| c["id"] == created["id"]));
}

// ============================================================================
// Products
// ============================================================================

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_crud() {
    let client = client();
    let category = unique("Mobiles");
    create_category(&client, &category).await;
    let product = create_product(&client, "Integration Phone", &category).await;
    let id = str_field(&product, "id");
    assert_eq!(id.len(), 24);

    let resp = client
        .get(format!("{}/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::OK);
    let shown: Value = resp.json().await.unwrap();
    assert_eq!(shown["category"]["name"], category.as_str());

    let resp = client
        .put(format!("{}/products/{id}", base_url()))
        .json(&json!({ "price": 9.5, "description": "" }))
        .send()
        .await
        .expect("Failed to update product");
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["price"].as_f64(), Some(9.5));
    assert_eq!(updated["description"], product["description"]);

    let resp = client
        .delete(format!("{}/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to delete product");
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = client
        .get(format!("{}/products/{id}", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_product_list_by_category_and_search() {
    let client = client();
    let category = unique("Laptops");
    create_category(&client, &category).await;
    let first = create_product(&client, "Ultrabook 100%", &category).await;
    let second = create_product(&client, "Gaming Rig", &category).await;

    let resp = client
        .get(format!(
            "{}/products?category={}",
            base_url(),
            category.to_lowercase()
        ))
        .send()
        .await
        .expect("Failed to list products");
    assert_eq!(resp.status(), StatusCode::OK);
    let listed: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0]["id"], second["id"]);

    // Wildcards in the term match literally
    let resp = client
        .get(format!(
            "{}/products?category={category}&search=100%25",
            base_url()
        ))
        .send()
        .await
        .expect("Failed to search products");
    let found: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["id"], first["id"]);

    delete_product(&client, str_field(&first, "id")).await;
    delete_product(&client, str_field(&second, "id")).await;
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn test_malformed_product_id() {
    let client = client();
    let resp = client
        .get(format!("{}/products/not-a-valid-id", base_url()))
        .send()
        .await
        .expect("Failed to get product");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Invalid product ID format (must be 24 hex characters)"
    );
}
