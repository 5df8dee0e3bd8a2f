//! Integration tests for the `/v1/shops` resource.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (cargo run -p shop-directory-cli -- migrate)
//! - The API server running (cargo run -p shop-directory-api)
//! - `SHOP_API_ADMIN_TOKEN` set to one of the server's admin tokens

use reqwest::{Method, StatusCode};
use serde_json::{Value, json};

use shop_directory_core::ShopId;
use shop_directory_integration_tests::{TestContext, unique_email};

/// Test helper: Create a shop and return its projection.
async fn create_shop(ctx: &TestContext, email: &str) -> Value {
    let resp = ctx
        .admin(Method::POST, "/v1/shops")
        .json(&json!({ "email": email, "address": "123 Main St" }))
        .send()
        .await
        .expect("Failed to create shop");

    assert_eq!(resp.status(), StatusCode::CREATED);
    resp.json().await.expect("Failed to parse shop")
}

/// Test helper: Delete a shop, ignoring failures.
async fn delete_shop(ctx: &TestContext, id: &str) {
    let _ = ctx
        .admin(Method::DELETE, &format!("/v1/shops/{id}"))
        .send()
        .await;
}

fn id_of(shop: &Value) -> String {
    shop["id"].as_str().expect("shop has an id").to_string()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_health_and_readiness() {
    let ctx = TestContext::from_env();

    let resp = ctx.request(Method::GET, "/health").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-request-id"));

    let resp = ctx.request(Method::GET, "/health/ready").send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ============================================================================
// CRUD lifecycle
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_shop_lifecycle() {
    let ctx = TestContext::from_env();
    let email = unique_email();

    let created = create_shop(&ctx, &email.to_uppercase()).await;
    let id = id_of(&created);
    assert!(ShopId::is_valid(&id));
    assert_eq!(created["email"], email.as_str());
    assert!(created["loc"].is_null());

    let resp = ctx
        .request(Method::GET, &format!("/v1/shops/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = ctx
        .admin(Method::PATCH, &format!("/v1/shops/{id}"))
        .json(&json!({ "address": "456 Side Ave" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = resp.json().await.unwrap();
    assert_eq!(updated["address"], "456 Side Ave");
    assert_eq!(updated["email"], email.as_str());

    let resp = ctx
        .admin(Method::PUT, &format!("/v1/shops/{id}"))
        .json(&json!({ "email": email, "address": "789 Last Blvd", "loc": [2.35, 48.85] }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let replaced: Value = resp.json().await.unwrap();
    assert_eq!(replaced["createdAt"], created["createdAt"]);
    assert_eq!(replaced["loc"], json!([2.35, 48.85]));

    let resp = ctx
        .admin(Method::DELETE, &format!("/v1/shops/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = ctx
        .request(Method::GET, &format!("/v1/shops/{id}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_duplicate_email_conflicts() {
    let ctx = TestContext::from_env();
    let email = unique_email();
    let shop = create_shop(&ctx, &email).await;

    let resp = ctx
        .admin(Method::POST, "/v1/shops")
        .json(&json!({ "email": email.to_uppercase(), "address": "123 Main St" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    delete_shop(&ctx, &id_of(&shop)).await;
}

#[tokio::test]
#[ignore = "Requires running API server and database"]
async fn test_list_filters_by_email() {
    let ctx = TestContext::from_env();
    let email = unique_email();
    let shop = create_shop(&ctx, &email).await;

    let resp = ctx
        .request(Method::GET, &format!("/v1/shops?email={email}&perPage=5"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let shops: Vec<Value> = resp.json().await.unwrap();
    assert_eq!(shops.len(), 1);
    assert_eq!(shops[0]["id"], shop["id"]);

    delete_shop(&ctx, &id_of(&shop)).await;
}

// ============================================================================
// Authorization & validation
// ============================================================================

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_create_requires_admin() {
    let ctx = TestContext::from_env();
    let body = json!({ "email": unique_email(), "address": "123 Main St" });

    let resp = ctx
        .request(Method::POST, "/v1/shops")
        .json(&body)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    if let Some(request) = ctx.user(Method::POST, "/v1/shops") {
        let resp = request.json(&body).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}

#[tokio::test]
#[ignore = "Requires running API server"]
async fn test_validation_errors_are_structured() {
    let ctx = TestContext::from_env();

    let resp = ctx
        .admin(Method::POST, "/v1/shops")
        .json(&json!({ "email": "nope", "address": "tiny" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["code"], 400);
    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["field"].as_str())
        .collect();
    assert_eq!(fields, vec!["email", "address"]);
}
