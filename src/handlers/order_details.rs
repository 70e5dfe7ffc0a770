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
use crate::services::order_details::OrderDetailInput;
use crate::AppState;

/// An order line addressed on its own, outside its parent order.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct OrderDetailRequest {
    pub order_id: i64,
    pub product_id: i64,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
    #[validate(custom(
        function = "validate_non_negative_amount",
        message = "Unit price cannot be negative"
    ))]
    pub unit_price: Decimal,
}

impl From<OrderDetailRequest> for OrderDetailInput {
    fn from(payload: OrderDetailRequest) -> Self {
        Self {
            order_id: payload.order_id,
            product_id: payload.product_id,
            quantity: payload.quantity,
            unit_price: payload.unit_price,
        }
    }
}

async fn list_order_details(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Response, ApiError> {
    let (page, per_page) = (params.page(), params.per_page());
    let (items, total) = state.services.order_details.list(page, per_page).await?;
    let body = PaginatedResponse::new(items, page, per_page, total);
    Ok(success_response("Order details loaded successfully", &body))
}

async fn get_order_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Response, ApiError> {
    let detail = state.services.order_details.get(id).await?;
    Ok(success_response("Order detail loaded successfully", &detail))
}

/// Reference data for line entry forms: active orders and active products.
async fn get_lookups(State(state): State<AppState>) -> Result<Response, ApiError> {
    let lookups = state.services.order_details.lookups().await?;
    Ok(success_response("Lookup data loaded successfully", &lookups))
}

async fn create_order_detail(
    State(state): State<AppState>,
    actor: RequestActor,
    Json(payload): Json<OrderDetailRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let detail = state
        .services
        .order_details
        .create(actor.name(), payload.into())
        .await?;
    Ok(created_response("Order detail created successfully", &detail))
}

async fn update_order_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
    Json(payload): Json<OrderDetailRequest>,
) -> Result<Response, ApiError> {
    validate_payload(&payload)?;
    let detail = state
        .services
        .order_details
        .update(actor.name(), id, payload.into())
        .await?;
    Ok(success_response("Order detail updated successfully", &detail))
}

async fn delete_order_detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    actor: RequestActor,
) -> Result<Response, ApiError> {
    state
        .services
        .order_details
        .delete(actor.name(), id)
        .await?;
    Ok(message_response("Order detail deleted successfully"))
}

pub fn order_detail_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_order_details).post(create_order_detail))
        .route("/lookups", get(get_lookups))
        .route(
            "/:id",
            get(get_order_detail)
                .put(update_order_detail)
                .delete(delete_order_detail),
        )
}
