//! Router tests over the in-memory store.
//!
//! Each test builds the full application (routes, extractors, error
//! mapping and middleware) and drives it with `oneshot`.

#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bazaar_server::db::MemoryStore;
use bazaar_server::middleware::REQUEST_ID_HEADER;
use bazaar_server::routes;
use bazaar_server::state::AppState;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

const UNKNOWN_ID: &str = "0123456789abcdef01234567";

struct TestApp {
    router: Router,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::new(Arc::new(MemoryStore::new()));
        Self {
            router: routes::app(state),
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send_request(request).await
    }

    async fn send_request(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn create_category(&self, name: &str) -> Value {
        let (status, body) = self.post("/categories", json!({ "name": name })).await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn create_product(&self, title: &str, category: &str, price: f64) -> Value {
        let (status, body) = self
            .post(
                "/products",
                json!({
                    "title": title,
                    "description": format!("{title} description"),
                    "price": price,
                    "imageUrl": "https://img.example/p.png",
                    "categoryName": category,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }

    async fn add_to_cart(&self, user: &str, product_id: &str, quantity: i64) -> Value {
        let (status, body) = self
            .post(
                "/cart",
                json!({ "userId": user, "productId": product_id, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body
    }
}

fn id_of(value: &Value) -> &str {
    value["id"].as_str().unwrap()
}

fn error_of(value: &Value) -> &str {
    value["error"].as_str().unwrap()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("ok"));

    let (status, _) = app.get("/health/ready").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = TestApp::new();
    let (status, body) = app.get("/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "No route for /nope");
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(
            Request::get("/health")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
}

// =============================================================================
// Categories
// =============================================================================

#[tokio::test]
async fn test_create_and_list_categories() {
    let app = TestApp::new();
    let created = app.create_category("  Shoes ").await;
    assert_eq!(created["name"], "Shoes");
    assert_eq!(id_of(&created).len(), 24);

    app.create_category("Books").await;

    let (status, body) = app.get("/categories").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Books", "Shoes"]);
}

#[tokio::test]
async fn test_duplicate_category_ignoring_case_conflicts() {
    let app = TestApp::new();
    app.create_category("Shoes").await;

    let (status, body) = app.post("/categories", json!({ "name": "shoes" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_of(&body), "Category already exists");
}

#[tokio::test]
async fn test_category_name_required() {
    let app = TestApp::new();
    for body in [json!({}), json!({ "name": "   " }), json!({ "name": 7 })] {
        let (status, response) = app.post("/categories", body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&response), "Category name is required");
    }
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_lifecycle() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let product = app.create_product("iPhone", "mobiles", 999.5).await;
    let id = id_of(&product).to_string();
    assert_eq!(product["price"].as_f64(), Some(999.5));
    assert_eq!(product["imageUrl"], "https://img.example/p.png");

    let (status, shown) = app.get(&format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["title"], "iPhone");
    assert_eq!(shown["category"]["name"], "Mobiles");

    let (status, updated) = app
        .put(&format!("/products/{id}"), json!({ "price": 899, "title": "" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"].as_f64(), Some(899.0));
    assert_eq!(updated["title"], "iPhone");

    let (status, body) = app.delete(&format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product deleted successfully");

    let (status, body) = app.get(&format!("/products/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "Product not found");
}

#[tokio::test]
async fn test_list_products_filters() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    app.create_category("Laptops").await;
    app.create_product("iPhone 15", "Mobiles", 999.0).await;
    app.create_product("Pixel 8", "Mobiles", 699.0).await;
    app.create_product("MacBook", "Laptops", 1999.0).await;

    let (status, body) = app.get("/products").await;
    assert_eq!(status, StatusCode::OK);
    let titles: Vec<_> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["MacBook", "Pixel 8", "iPhone 15"]);

    let (_, body) = app.get("/products?category=mobiles").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = app.get("/products?category=Mobiles&search=IPHONE").await;
    let found = body.as_array().unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0]["title"], "iPhone 15");

    let (status, body) = app.get("/products?category=Garden").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_create_product_validation() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let valid = json!({
        "title": "Phone",
        "description": "A phone",
        "price": 10,
        "imageUrl": "http://img.example/p.png",
        "categoryName": "Mobiles",
    });

    let mut missing = valid.clone();
    missing["description"] = json!("  ");
    let (status, body) = app.post("/products", missing).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "All fields are required");

    for price in [json!(0), json!(-3), json!("10")] {
        let mut bad = valid.clone();
        bad["price"] = price;
        let (status, body) = app.post("/products", bad).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "Price must be a positive number");
    }

    let mut bad_url = valid.clone();
    bad_url["imageUrl"] = json!("ftp://img.example/p.png");
    let (status, body) = app.post("/products", bad_url).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "imageUrl must be a valid URL");

    let mut unknown = valid;
    unknown["categoryName"] = json!("Garden");
    let (status, body) = app.post("/products", unknown).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "Category not found");
}

#[tokio::test]
async fn test_update_and_delete_missing_product() {
    let app = TestApp::new();
    let uri = format!("/products/{UNKNOWN_ID}");

    let (status, _) = app.put(&uri, json!({ "title": "X" })).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_cart_without_cart_is_empty() {
    let app = TestApp::new();
    let (status, body) = app.get("/cart?userId=nobody").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn test_cart_requires_user_id() {
    let app = TestApp::new();
    let (status, body) = app.get("/cart").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "userId is required");
}

#[tokio::test]
async fn test_adding_same_product_twice_yields_two_lines() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let product = app.create_product("Pixel", "Mobiles", 699.0).await;
    let product_id = id_of(&product);

    let first = app.add_to_cart("u1", product_id, 1).await;
    let second = app.add_to_cart("u1", product_id, 2).await;
    assert_ne!(first["id"], second["id"]);
    assert_eq!(first["cartId"], second["cartId"]);

    let (status, cart) = app.get("/cart?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cart["userId"], "u1");
    let items = cart["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["quantity"], 1);
    assert_eq!(items[1]["quantity"], 2);
    assert_eq!(items[0]["product"]["title"], "Pixel");
}

#[tokio::test]
async fn test_cart_hides_items_of_deleted_products() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let kept = app.create_product("Pixel", "Mobiles", 699.0).await;
    let gone = app.create_product("Nokia", "Mobiles", 99.0).await;
    app.add_to_cart("u1", id_of(&gone), 1).await;
    app.add_to_cart("u1", id_of(&kept), 1).await;
    app.add_to_cart("u1", id_of(&gone), 3).await;

    let (status, _) = app.delete(&format!("/products/{}", id_of(&gone))).await;
    assert_eq!(status, StatusCode::OK);

    // Filtering is repeated on every read; nothing is deleted
    for _ in 0..2 {
        let (_, cart) = app.get("/cart?userId=u1").await;
        let items = cart["items"].as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["productId"], kept["id"]);
    }
}

#[tokio::test]
async fn test_add_item_validation() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let product = app.create_product("Pixel", "Mobiles", 699.0).await;
    let product_id = id_of(&product);

    let (status, body) = app
        .post("/cart", json!({ "userId": "u1", "productId": product_id }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "userId, productId, and quantity are required");

    for quantity in [json!(0), json!(-1), json!(1.5), json!("2")] {
        let (status, body) = app
            .post(
                "/cart",
                json!({ "userId": "u1", "productId": product_id, "quantity": quantity }),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error_of(&body), "Quantity must be a positive integer");
    }

    let (status, body) = app
        .post(
            "/cart",
            json!({ "userId": "u1", "productId": UNKNOWN_ID, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "Product not found");

    let (status, _) = app.get("/cart?userId=u1").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_remove_item_twice_is_not_found() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let product = app.create_product("Pixel", "Mobiles", 699.0).await;
    let item = app.add_to_cart("u1", id_of(&product), 1).await;
    let uri = format!("/cart/{}", id_of(&item));

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Item removed from cart");

    let (status, body) = app.delete(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_of(&body), "Cart item not found");
}

// =============================================================================
// Malformed input
// =============================================================================

#[tokio::test]
async fn test_malformed_ids_are_bad_requests() {
    let app = TestApp::new();

    for (method, uri, body) in [
        (Method::GET, "/products/not-an-id", None),
        (Method::PUT, "/products/not-an-id", Some(json!({ "title": "X" }))),
        (Method::DELETE, "/products/not-an-id", None),
        (Method::DELETE, "/cart/not-an-id", None),
        (
            Method::POST,
            "/cart",
            Some(json!({ "userId": "u1", "productId": "xyz", "quantity": 1 })),
        ),
    ] {
        let (status, response) = app.send(method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{method} {uri}");
        assert!(response["error"].is_string(), "{method} {uri}");
    }
}

#[tokio::test]
async fn test_invalid_json_is_bad_request() {
    let app = TestApp::new();

    let request = Request::post("/categories")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send_request(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app
        .post("/cart", json!({ "userId": 5, "productId": UNKNOWN_ID, "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_undecodable_query_is_json_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.get("/cart?userId=a&userId=b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.get("/products?search=a&search=b").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_undecodable_path_is_json_bad_request() {
    let app = TestApp::new();

    let (status, body) = app.get("/products/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = app.delete("/cart/%FF").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_unsupported_method_is_json_405() {
    let app = TestApp::new();

    let uri = format!("/products/{UNKNOWN_ID}");
    let (status, body) = app.send(Method::PATCH, &uri, None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(error_of(&body), format!("PATCH not allowed on {uri}"));

    let (status, body) = app.send(Method::PUT, "/cart", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_update_with_null_price_is_rejected() {
    let app = TestApp::new();
    app.create_category("Mobiles").await;
    let product = app.create_product("Pixel", "Mobiles", 499.0).await;
    let uri = format!("/products/{}", id_of(&product));

    let (status, body) = app.put(&uri, json!({ "price": null })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_of(&body), "Price must be a positive number");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["price"].as_f64(), Some(499.0));
}
