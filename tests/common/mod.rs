#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use orbit_ims::{config::AppConfig, db, handlers::AppServices, AppState};

/// Helper harness for spinning up the application against an in-memory
/// SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            8080,
            "test".to_string(),
        );
        cfg.auto_migrate = true;
        // A single pooled connection keeps every query on the same
        // in-memory database.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let services = AppServices::new(db.clone());
        let state = AppState {
            db,
            config: cfg,
            services,
        };
        let router = orbit_ims::app_router(state.clone());
        Self { router, state }
    }

    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("x-actor-name", "tester");
        let request = match body {
            Some(payload) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(payload.to_string()))
                .expect("failed to build request"),
            None => builder.body(Body::empty()).expect("failed to build request"),
        };
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router call failed")
    }

    /// Issue a request and parse the notification envelope.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("failed to read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("failed to parse response body")
        };
        (status, value)
    }

    pub async fn seed_customer(&self, name: &str) -> i64 {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/customers",
                Some(json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                    "mobile": "555-0100",
                    "address": "1 Warehouse Road"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed customer: {body}");
        body["data"]["id"].as_i64().expect("seeded customer id")
    }

    pub async fn seed_category(&self, name: &str) -> i64 {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/categories",
                Some(json!({ "name": name, "description": "seeded" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed category: {body}");
        body["data"]["id"].as_i64().expect("seeded category id")
    }

    pub async fn seed_supplier(&self, name: &str) -> i64 {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/suppliers",
                Some(json!({
                    "name": name,
                    "email": format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
                    "mobile": "555-0200",
                    "address": "2 Depot Street"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed supplier: {body}");
        body["data"]["id"].as_i64().expect("seeded supplier id")
    }

    pub async fn seed_product(
        &self,
        name: &str,
        price: &str,
        category_id: i64,
        supplier_id: i64,
    ) -> i64 {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/v1/products",
                Some(json!({
                    "name": name,
                    "description": "seeded",
                    "price": price,
                    "stock_quantity": 25,
                    "category_id": category_id,
                    "supplier_id": supplier_id
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "seed product: {body}");
        body["data"]["id"].as_i64().expect("seeded product id")
    }
}
