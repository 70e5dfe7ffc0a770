mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

struct Catalog {
    customer_id: i64,
    keyboard_id: i64,
    monitor_id: i64,
}

async fn seed_catalog(app: &TestApp) -> Catalog {
    let customer_id = app.seed_customer("Ada Lovelace").await;
    let category_id = app.seed_category("Peripherals").await;
    let supplier_id = app.seed_supplier("Acme Components").await;
    let keyboard_id = app
        .seed_product("Keyboard", "29.99", category_id, supplier_id)
        .await;
    let monitor_id = app
        .seed_product("Monitor", "49.99", category_id, supplier_id)
        .await;
    Catalog {
        customer_id,
        keyboard_id,
        monitor_id,
    }
}

#[tokio::test]
async fn creating_an_order_derives_line_and_order_totals() {
    let app = TestApp::new().await;
    let catalog = seed_catalog(&app).await;

    // Client-supplied totals must not survive.
    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": catalog.customer_id,
                "lines": [
                    {
                        "product_id": catalog.keyboard_id,
                        "quantity": 2,
                        "unit_price": "29.99",
                        "total_price": "999.99"
                    },
                    {
                        "product_id": catalog.monitor_id,
                        "quantity": 1,
                        "unit_price": "49.99"
                    }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["message"], json!("Order created successfully"));
    assert_eq!(body["data"]["status"], json!("Pending"));
    assert_eq!(body["data"]["total_amount"], json!("109.97"));
    assert_eq!(body["data"]["customer"]["name"], json!("Ada Lovelace"));

    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["total_price"], json!("59.98"));
    assert_eq!(lines[0]["product"]["name"], json!("Keyboard"));
    assert_eq!(lines[1]["total_price"], json!("49.99"));
}

#[tokio::test]
async fn updating_an_order_reconciles_its_line_set() {
    let app = TestApp::new().await;
    let catalog = seed_catalog(&app).await;

    let (_, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": catalog.customer_id,
                "lines": [
                    { "product_id": catalog.keyboard_id, "quantity": 2, "unit_price": "29.99" },
                    { "product_id": catalog.monitor_id, "quantity": 1, "unit_price": "49.99" }
                ]
            })),
        )
        .await;
    let order_id = body["data"]["id"].as_i64().unwrap();
    let lines = body["data"]["lines"].as_array().unwrap();
    let kept_line_id = lines[0]["id"].as_i64().unwrap();
    let dropped_line_id = lines[1]["id"].as_i64().unwrap();

    // Keep the first line with a new quantity, drop the second, add a new one.
    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/orders/{order_id}"),
            Some(json!({
                "customer_id": catalog.customer_id,
                "status": "Processing",
                "lines": [
                    {
                        "id": kept_line_id,
                        "product_id": catalog.keyboard_id,
                        "quantity": 3,
                        "unit_price": "29.99"
                    },
                    {
                        "product_id": catalog.monitor_id,
                        "quantity": 1,
                        "unit_price": "10.00"
                    }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["data"]["status"], json!("Processing"));
    assert_eq!(body["data"]["total_amount"], json!("99.97"));

    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines.len(), 2);
    let ids: Vec<i64> = lines
        .iter()
        .map(|line| line["id"].as_i64().unwrap())
        .collect();
    assert!(ids.contains(&kept_line_id));
    assert!(!ids.contains(&dropped_line_id));
    assert_eq!(lines[0]["total_price"], json!("89.97"));

    // The dropped line is gone for good.
    let (status, _) = app
        .request_json(
            Method::GET,
            &format!("/api/v1/order-details/{dropped_line_id}"),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_order_removes_its_lines() {
    let app = TestApp::new().await;
    let catalog = seed_catalog(&app).await;

    let (_, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": catalog.customer_id,
                "lines": [
                    { "product_id": catalog.keyboard_id, "quantity": 1, "unit_price": "29.99" }
                ]
            })),
        )
        .await;
    let order_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = app
        .request_json(Method::DELETE, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .request_json(Method::GET, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .request_json(Method::GET, "/api/v1/order-details", None)
        .await;
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn order_with_unknown_customer_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({ "customer_id": 4711, "lines": [] })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], json!("Customer 4711 does not exist"));
}

#[tokio::test]
async fn invalid_line_quantity_is_reported_in_the_joined_message() {
    let app = TestApp::new().await;
    let catalog = seed_catalog(&app).await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": catalog.customer_id,
                "lines": [
                    { "product_id": catalog.keyboard_id, "quantity": 0, "unit_price": "29.99" }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .contains("Quantity must be at least 1"));
}
