use axum::{
    extract::{Path, Query, State},
    response::Response,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use super::common::{
    created_response, message_response, success_response, validate_non_negative_amount,
    validate_payload, PaginatedResponse, PaginationParams, RequestActor,
};
use crate::errors::ApiError;
use crate::services::products::ProductInput;
use crate::AppState;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ProductRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Product name is required and cannot exceed 100 characters"
    ))]
    pub name: String,
    #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
    #[serde(default)]
    pub description: String,
    #[validate(custom(
        function = "validate_non_negative_amount",
        message = "Price cannot be negative"
    ))]
    pub price: Decimal,
    #[validate(range(min = 0, message = "Stock quantity cannot be negative"))]
    #[serde(default)]
    pub stock_quantity: i32,
    pub category_id: i64,
    pub supplier_id: i64,
}

impl From<ProductRequest> for ProductInput {
    fn from(payload: ProductRequest) -> Self {
        Self {
            name: payload.name,
            description: payload.description,
            price: payload.price,
            stock_quantity: payload.stock_quantity,
            category_id: payload.category_id,
            supplier_id: payload.supplier_id,
        }
    }
}

async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.products.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Products loaded successfully", &body))
}

async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let product = state.services.products.get(id).await?;
    Ok(success_response("Product loaded successfully", &product))
}

async fn create_product(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<ProductRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let product = state
        .services
        .products
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Product created successfully", &product))
}

async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<ProductRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let product = state
        .services
        .products
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Product updated successfully", &product))
}

async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    state.services.products.delete(id).await?;
    Ok(message_response("Product deleted successfully"))
}

pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
}
