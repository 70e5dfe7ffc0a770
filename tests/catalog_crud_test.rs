mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn category_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/categories",
            Some(json!({ "name": "Peripherals", "description": "Keyboards and mice" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], json!("Category created successfully"));
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/categories/{id}"),
            Some(json!({ "name": "Accessories", "description": "Keyboards and mice" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Accessories"));

    let (status, body) = app
        .request_json(Method::DELETE, &format!("/api/v1/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/v1/categories/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], json!("Category not found"));
}

#[tokio::test]
async fn supplier_requires_valid_email() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/suppliers",
            Some(json!({
                "name": "Acme Components",
                "email": "nope",
                "mobile": "555-0200",
                "address": "2 Depot Street"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Email must be a valid email address"));
}

#[tokio::test]
async fn product_read_paths_embed_category_and_supplier() {
    let app = TestApp::new().await;

    let category_id = app.seed_category("Storage").await;
    let supplier_id = app.seed_supplier("Acme Components").await;
    let product_id = app
        .seed_product("SSD 1TB", "129.99", category_id, supplier_id)
        .await;

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/v1/products/{product_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("SSD 1TB"));
    assert_eq!(body["data"]["price"], json!("129.99"));
    assert_eq!(body["data"]["category"]["name"], json!("Storage"));
    assert_eq!(body["data"]["supplier"]["name"], json!("Acme Components"));

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/products", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"]["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["category"]["name"], json!("Storage"));
    assert_eq!(items[0]["supplier"]["name"], json!("Acme Components"));
}

#[tokio::test]
async fn product_with_unknown_references_is_rejected() {
    let app = TestApp::new().await;

    let supplier_id = app.seed_supplier("Acme Components").await;
    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "SSD 1TB",
                "description": "NVMe",
                "price": "129.99",
                "stock_quantity": 5,
                "category_id": 4711,
                "supplier_id": supplier_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Category 4711 does not exist"));
}

#[tokio::test]
async fn negative_price_is_rejected() {
    let app = TestApp::new().await;

    let category_id = app.seed_category("Storage").await;
    let supplier_id = app.seed_supplier("Acme Components").await;
    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/products",
            Some(json!({
                "name": "SSD 1TB",
                "description": "NVMe",
                "price": "-1.00",
                "stock_quantity": 5,
                "category_id": category_id,
                "supplier_id": supplier_id
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Price cannot be negative"));
}
