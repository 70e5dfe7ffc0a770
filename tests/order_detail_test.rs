mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

struct Fixture {
    order_id: i64,
    keyboard_id: i64,
    monitor_id: i64,
    line_id: i64,
}

/// Order with one keyboard line (2 x 29.99 = 59.98).
async fn seed_order(app: &TestApp) -> Fixture {
    let customer_id = app.seed_customer("Ada Lovelace").await;
    let category_id = app.seed_category("Peripherals").await;
    let supplier_id = app.seed_supplier("Acme Components").await;
    let keyboard_id = app
        .seed_product("Keyboard", "29.99", category_id, supplier_id)
        .await;
    let monitor_id = app
        .seed_product("Monitor", "49.99", category_id, supplier_id)
        .await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/orders",
            Some(json!({
                "customer_id": customer_id,
                "lines": [
                    { "product_id": keyboard_id, "quantity": 2, "unit_price": "29.99" }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "seed order: {body}");
    Fixture {
        order_id: body["data"]["id"].as_i64().unwrap(),
        keyboard_id,
        monitor_id,
        line_id: body["data"]["lines"][0]["id"].as_i64().unwrap(),
    }
}

async fn order_total(app: &TestApp, order_id: i64) -> String {
    let (_, body) = app
        .request_json(Method::GET, &format!("/api/v1/orders/{order_id}"), None)
        .await;
    body["data"]["total_amount"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn lookups_list_active_orders_and_products() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/order-details/lookups", None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let orders = body["data"]["orders"].as_array().unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(
        orders[0]["display_text"],
        json!(format!("Order #{} - Ada Lovelace", fixture.order_id))
    );

    // Products come back sorted by name with id, name and price only.
    let products = body["data"]["products"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["name"], json!("Keyboard"));
    assert_eq!(products[0]["price"], json!("29.99"));
    assert_eq!(products[1]["name"], json!("Monitor"));
    assert!(products[0]["stock_quantity"].is_null());
}

#[tokio::test]
async fn detail_read_embeds_order_customer_and_product() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;

    let (status, body) = app
        .request_json(
            Method::GET,
            &format!("/api/v1/order-details/{}", fixture.line_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_price"], json!("59.98"));
    assert_eq!(body["data"]["product"]["name"], json!("Keyboard"));
    assert_eq!(
        body["data"]["order"]["customer"]["name"],
        json!("Ada Lovelace")
    );
}

#[tokio::test]
async fn standalone_line_create_refreshes_the_order_total() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;
    assert_eq!(order_total(&app, fixture.order_id).await, "59.98");

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/order-details",
            Some(json!({
                "order_id": fixture.order_id,
                "product_id": fixture.monitor_id,
                "quantity": 1,
                "unit_price": "49.99",
                "total_price": "0.01"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "body: {body}");
    assert_eq!(body["data"]["total_price"], json!("49.99"));

    assert_eq!(order_total(&app, fixture.order_id).await, "109.97");
}

#[tokio::test]
async fn updating_a_line_recomputes_both_totals() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/order-details/{}", fixture.line_id),
            Some(json!({
                "order_id": fixture.order_id,
                "product_id": fixture.keyboard_id,
                "quantity": 5,
                "unit_price": "29.99"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    assert_eq!(body["data"]["total_price"], json!("149.95"));

    assert_eq!(order_total(&app, fixture.order_id).await, "149.95");
}

#[tokio::test]
async fn deleting_a_line_refreshes_the_order_total() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;

    let (status, body) = app
        .request_json(
            Method::DELETE,
            &format!("/api/v1/order-details/{}", fixture.line_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Order detail deleted successfully"));

    assert_eq!(order_total(&app, fixture.order_id).await, "0");
}

#[tokio::test]
async fn mutating_a_deleted_line_reports_not_found() {
    let app = TestApp::new().await;
    let fixture = seed_order(&app).await;

    app.request_json(
        Method::DELETE,
        &format!("/api/v1/order-details/{}", fixture.line_id),
        None,
    )
    .await;

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/order-details/{}", fixture.line_id),
            Some(json!({
                "order_id": fixture.order_id,
                "product_id": fixture.keyboard_id,
                "quantity": 1,
                "unit_price": "29.99"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Order detail not found"));

    let (status, _) = app
        .request_json(
            Method::DELETE,
            &format!("/api/v1/order-details/{}", fixture.line_id),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
