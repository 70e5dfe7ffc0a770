mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::TestApp;

#[tokio::test]
async fn customer_crud_round_trip() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/customers",
            Some(json!({
                "name": "Ada Lovelace",
                "email": "ada@example.com",
                "mobile": "555-0101",
                "address": "12 Analytical Way"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["notificationType"], json!("success"));
    assert_eq!(body["message"], json!("Customer created successfully"));
    assert_eq!(body["data"]["created_by"], json!("tester"));
    assert_eq!(body["data"]["is_active"], json!(true));
    let id = body["data"]["id"].as_i64().expect("created id");

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/v1/customers/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Ada Lovelace"));

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/customers", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["total"], json!(1));

    let (status, body) = app
        .request_json(
            Method::PUT,
            &format!("/api/v1/customers/{id}"),
            Some(json!({
                "name": "Ada King",
                "email": "ada@example.com",
                "mobile": "555-0101",
                "address": "12 Analytical Way"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Ada King"));
    assert_eq!(body["data"]["updated_by"], json!("tester"));
    assert!(body["data"]["updated_at"].is_string());

    let (status, body) = app
        .request_json(Method::DELETE, &format!("/api/v1/customers/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], json!("Customer deleted successfully"));
    assert_eq!(body["data"], json!(null));

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/v1/customers/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Customer not found"));
    assert_eq!(body["notificationType"], json!("error"));
}

#[tokio::test]
async fn invalid_customer_payload_joins_all_field_errors() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::POST,
            "/api/v1/customers",
            Some(json!({
                "name": "",
                "email": "not-an-email",
                "mobile": "555-0101",
                "address": "somewhere"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["notificationType"], json!("error"));
    let message = body["message"].as_str().unwrap();
    assert!(message.contains("Name is required"), "message: {message}");
    assert!(
        message.contains("Email must be a valid email address"),
        "message: {message}"
    );
}

#[tokio::test]
async fn updating_a_missing_customer_reports_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(
            Method::PUT,
            "/api/v1/customers/4711",
            Some(json!({
                "name": "Ghost",
                "email": "ghost@example.com",
                "mobile": "555-0000",
                "address": "Nowhere"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["message"], json!("Customer not found"));
}

#[tokio::test]
async fn list_reflects_persisted_rows_exactly() {
    let app = TestApp::new().await;

    let first = app.seed_customer("First Customer").await;
    let second = app.seed_customer("Second Customer").await;
    let third = app.seed_customer("Third Customer").await;

    app.request_json(Method::DELETE, &format!("/api/v1/customers/{second}"), None)
        .await;

    let (status, body) = app
        .request_json(Method::GET, "/api/v1/customers", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = body["data"]["items"]
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![first, third]);
    assert_eq!(body["data"]["pagination"]["total"], json!(2));
}
