//! Orbit IMS: a CRUD inventory-management backend.
//!
//! Handlers bind HTTP requests to the ORM, validate payloads and persist
//! customers, categories, suppliers, products, orders and order lines.
//! Every JSON response is wrapped in the notification envelope
//! (`{ success, message, data, notificationType }`).

use std::sync::Arc;

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod notifications;
pub mod openapi;
pub mod services;

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

/// All entity routers, mounted under `/api/v1`.
pub fn api_v1_routes() -> Router<AppState> {
    Router::new()
        .nest("/customers", handlers::customers::customer_routes())
        .nest("/categories", handlers::categories::category_routes())
        .nest("/suppliers", handlers::suppliers::supplier_routes())
        .nest("/products", handlers::products::product_routes())
        .nest("/orders", handlers::orders::order_routes())
        .nest(
            "/order-details",
            handlers::order_details::order_detail_routes(),
        )
}

/// Full application router: root banner, versioned API, health check and
/// Swagger UI. Middleware layers are applied by the binary.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "orbit-ims up" }))
        .nest("/api/v1", api_v1_routes())
        .nest("/health", handlers::health::health_routes())
        .merge(openapi::swagger_ui())
        .with_state(state)
}
